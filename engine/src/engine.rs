//! The badge lifecycle operations.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{archive_event, merge_acceptance, Config, EngineError};
use laurel_crypto::public_from_private;
use laurel_events::{
    build_award, build_definition, build_profile_badges, parse_definition, AcceptanceEntry,
    BadgeDefinition, DefinitionRef, Event, EventError, ProfileBadges, PROFILE_BADGES_D_TAG,
};
use laurel_relay::{fetch_latest, publish_event, Filter, PublishOptions, PublishReport};
use laurel_types::{
    EventId, PrivateKey, PublicKey, Timestamp, KIND_BADGE_DEFINITION, KIND_PROFILE_BADGES,
};

/// Supplies a recipient's current profile badges event, if any.
///
/// Production uses [`RelayAggregateSource`]; tests substitute their own.
#[allow(async_fn_in_trait)]
pub trait AggregateSource {
    async fn current_aggregate(&self, recipient: &PublicKey) -> Result<Option<Event>, String>;
}

/// Outcome of creating (or ensuring) a badge definition.
#[derive(Debug)]
pub enum DefinitionStatus {
    /// The definition already exists on at least one relay; nothing was
    /// published.
    Existing { reference: DefinitionRef },
    /// A new definition event was signed and published.
    Published {
        reference: DefinitionRef,
        event: Event,
        report: PublishReport,
    },
}

/// Outcome of a badge award.
#[derive(Debug)]
pub struct AwardOutcome {
    pub event: Event,
    pub report: PublishReport,
}

/// Outcome of accepting a badge.
#[derive(Debug)]
pub struct AcceptOutcome {
    pub event: Event,
    pub total_badges: usize,
    pub report: PublishReport,
}

/// The lifecycle engine. Holds configuration only — no keys, no selection,
/// no state between calls.
pub struct BadgeEngine {
    config: Config,
}

impl BadgeEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn require_relays(&self) -> Result<(), EngineError> {
        if self.config.relays.is_empty() {
            return Err(EngineError::NoRelays);
        }
        Ok(())
    }

    fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            timeout: self.config.timeout(),
            verify: self.config.verify_publish,
        }
    }

    fn archive(&self, event: &Event) {
        match archive_event(&self.config.archive_dir, event) {
            Ok(path) => debug!(path = %path.display(), "archived signed event"),
            Err(e) => warn!("could not archive event {}: {e}", event.id),
        }
    }

    /// Build, sign, and publish a Badge Definition event.
    pub async fn create_definition(
        &self,
        def: &BadgeDefinition,
        issuer: &PrivateKey,
    ) -> Result<DefinitionStatus, EngineError> {
        self.require_relays()?;
        let issuer_pub = public_from_private(issuer)?;
        let reference = DefinitionRef::new(issuer_pub, def.identifier.clone())?;

        let event = build_definition(def, &issuer_pub, Timestamp::now())?.sign(issuer)?;
        self.archive(&event);

        info!(identifier = %def.identifier, "publishing badge definition");
        let report = publish_event(&event, &self.config.relays, &self.publish_options()).await?;
        Ok(DefinitionStatus::Published {
            reference,
            event,
            report,
        })
    }

    /// Publish the definition only if no relay already has a valid copy.
    pub async fn ensure_definition(
        &self,
        def: &BadgeDefinition,
        issuer: &PrivateKey,
    ) -> Result<DefinitionStatus, EngineError> {
        self.require_relays()?;
        let issuer_pub = public_from_private(issuer)?;
        let reference = DefinitionRef::new(issuer_pub, def.identifier.clone())?;

        let filter = Filter::new()
            .kinds([KIND_BADGE_DEFINITION])
            .author(issuer_pub)
            .d_tag(def.identifier.clone())
            .limit(1);
        if let Some(existing) =
            fetch_latest(&filter, &self.config.relays, self.config.timeout()).await
        {
            if existing.verify() && parse_definition(&existing).is_ok() {
                info!(identifier = %def.identifier, "definition already published");
                return Ok(DefinitionStatus::Existing { reference });
            }
            warn!(
                identifier = %def.identifier,
                "found a definition event that does not verify; republishing"
            );
        }
        self.create_definition(def, issuer).await
    }

    /// Build, sign, and publish one Badge Award covering all recipients.
    pub async fn award_badge(
        &self,
        definition: &DefinitionRef,
        recipients: &[PublicKey],
        issuer: &PrivateKey,
    ) -> Result<AwardOutcome, EngineError> {
        self.require_relays()?;
        let issuer_pub = public_from_private(issuer)?;
        if issuer_pub != definition.issuer {
            return Err(EngineError::IssuerMismatch);
        }

        let event = build_award(definition, recipients, Timestamp::now())?.sign(issuer)?;
        self.archive(&event);

        info!(
            identifier = %definition.identifier,
            recipients = recipients.len(),
            "publishing badge award"
        );
        let report = publish_event(&event, &self.config.relays, &self.publish_options()).await?;
        Ok(AwardOutcome { event, report })
    }

    /// Accept an award into the recipient's profile badges aggregate.
    ///
    /// Stages: fetch the current aggregate, merge the new entry, build the
    /// replacement event, sign, publish. Any stage failure ends the call;
    /// [`EngineError::stage`] names the failing stage. No stage is retried.
    pub async fn accept_badge<S: AggregateSource>(
        &self,
        recipient: &PrivateKey,
        definition: DefinitionRef,
        award: EventId,
        source: &S,
    ) -> Result<AcceptOutcome, EngineError> {
        self.require_relays()?;
        let recipient_pub = public_from_private(recipient)?;

        // Fetch
        let current_event = source
            .current_aggregate(&recipient_pub)
            .await
            .map_err(EngineError::Fetch)?;

        // Merge
        let current = match &current_event {
            None => None,
            Some(event) => {
                if event.pubkey != recipient_pub || !event.verify() {
                    return Err(EngineError::Event(EventError::CorruptAggregate {
                        reason: "current aggregate is not a valid event signed by the recipient"
                            .into(),
                        event: Box::new(event.clone()),
                    }));
                }
                Some(ProfileBadges::from_event(event)?)
            }
        };
        let before = current.as_ref().map_or(0, ProfileBadges::len);

        let mut entry = AcceptanceEntry::new(definition, award);
        if let Some(first_relay) = self.config.relays.first() {
            entry = entry.with_relay_hint(first_relay.clone());
        }
        let merged = merge_acceptance(current, entry);
        if merged.len() == before {
            info!("badge already accepted; republishing the unchanged aggregate");
        }

        // Build
        let unsigned = build_profile_badges(&merged, &recipient_pub, Timestamp::now())?;

        // Sign
        let event = unsigned.sign(recipient)?;
        self.archive(&event);

        // Publish
        info!(total = merged.len(), "publishing profile badges aggregate");
        let report = publish_event(&event, &self.config.relays, &self.publish_options()).await?;
        Ok(AcceptOutcome {
            event,
            total_badges: merged.len(),
            report,
        })
    }
}

/// Fetches the current aggregate from the configured relays.
pub struct RelayAggregateSource {
    relays: Vec<String>,
    timeout: Duration,
}

impl RelayAggregateSource {
    pub fn new(relays: Vec<String>, timeout: Duration) -> Self {
        Self { relays, timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.relays.clone(), config.timeout())
    }
}

impl AggregateSource for RelayAggregateSource {
    async fn current_aggregate(&self, recipient: &PublicKey) -> Result<Option<Event>, String> {
        let filter = Filter::new()
            .kinds([KIND_PROFILE_BADGES])
            .author(*recipient)
            .d_tag(PROFILE_BADGES_D_TAG)
            .limit(1);
        Ok(fetch_latest(&filter, &self.relays, self.timeout).await)
    }
}
