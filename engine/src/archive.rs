//! Best-effort archive of signed events to disk.
//!
//! Every signed event is written out before publishing so a failed publish
//! can be retried from the file. Archive failures are the caller's to log;
//! they must never abort a publish.

use std::io;
use std::path::{Path, PathBuf};

use laurel_events::Event;

/// Write a signed event as pretty JSON under `dir`, creating the directory
/// if needed. Returns the path written.
pub fn archive_event(dir: &Path, event: &Event) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = format!("event_{}_{}.json", event.kind, &event.id.to_hex()[..12]);
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(event).map_err(io::Error::other)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laurel_crypto::public_from_private;
    use laurel_events::{Tag, UnsignedEvent};
    use laurel_types::{PrivateKey, Timestamp};

    fn signed_event() -> Event {
        let private = PrivateKey([8u8; 32]);
        UnsignedEvent {
            pubkey: public_from_private(&private).unwrap(),
            created_at: Timestamp::new(1_700_000_000),
            kind: 8,
            tags: vec![Tag::new(["p", "00"])],
            content: "archived".to_string(),
        }
        .sign(&private)
        .unwrap()
    }

    #[test]
    fn writes_a_parseable_event_file() {
        let dir = tempfile::tempdir().unwrap();
        let event = signed_event();

        let path = archive_event(dir.path(), &event).unwrap();
        assert!(path.starts_with(dir.path()));

        let contents = std::fs::read_to_string(&path).unwrap();
        let back: Event = serde_json::from_str(&contents).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("events");
        let path = archive_event(&nested, &signed_event()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn same_event_overwrites_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let event = signed_event();
        let first = archive_event(dir.path(), &event).unwrap();
        let second = archive_event(dir.path(), &event).unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
