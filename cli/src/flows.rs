//! The interactive awarding and acceptance flows.

use std::path::PathBuf;

use anyhow::Context;

use crate::{prompt, report};
use laurel_crypto::{
    normalize_public_key, npub_from_public_key, private_key_from_nsec, public_from_private,
};
use laurel_engine::{
    load_definitions, BadgeEngine, Config, DefinitionStatus, RelayAggregateSource,
};
use laurel_events::DefinitionRef;
use laurel_types::EventId;

/// Interactive awarding: pick a badge, name recipients, publish the
/// definition (if new) and the award.
pub async fn award(config: Config, definitions_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = definitions_dir.unwrap_or_else(|| config.definitions_dir.clone());
    let definitions = load_definitions(&dir)?;

    println!("Available badges:");
    for (i, def) in definitions.iter().enumerate() {
        println!("  [{}] {} — {}", i + 1, def.name, def.description);
    }
    let choice: usize = prompt::line("Select a badge to award (number): ")?
        .parse()
        .context("not a number")?;
    let def = choice
        .checked_sub(1)
        .and_then(|i| definitions.get(i))
        .context("no badge with that number")?;

    let nsec = prompt::nsec("Enter your private key (nsec): ")?;
    let issuer = private_key_from_nsec(&nsec)?;
    let issuer_pub = public_from_private(&issuer)?;
    println!("Issuer: {}", npub_from_public_key(&issuer_pub));

    let raw_recipients = prompt::recipients()?;
    if raw_recipients.is_empty() {
        anyhow::bail!("no recipients provided");
    }
    let mut recipients = Vec::with_capacity(raw_recipients.len());
    for raw in &raw_recipients {
        recipients
            .push(normalize_public_key(raw).with_context(|| format!("bad recipient key {raw:?}"))?);
    }

    println!(
        "Ready to award {:?} to {} recipient(s) via {} relay(s).",
        def.name,
        recipients.len(),
        config.relays.len()
    );
    if !prompt::confirm("Proceed?")? {
        anyhow::bail!("cancelled");
    }

    let engine = BadgeEngine::new(config);
    let reference = match engine.ensure_definition(def, &issuer).await? {
        DefinitionStatus::Existing { reference } => {
            println!("Definition already on relays: {reference}");
            reference
        }
        DefinitionStatus::Published {
            reference, report, ..
        } => {
            report::print_report(&report);
            report::ensure_published(&report)?;
            println!("Definition published: {reference}");
            reference
        }
    };

    let outcome = engine.award_badge(&reference, &recipients, &issuer).await?;
    report::print_report(&outcome.report);
    report::ensure_published(&outcome.report)?;

    println!();
    println!("Badge awarded.");
    println!("  Definition:     {reference}");
    println!("  Award event id: {}", outcome.event.id);
    println!(
        "Recipients accept with: laurel accept --badge {reference} --award {}",
        outcome.event.id
    );
    Ok(())
}

/// Acceptance: arguments when given, prompts otherwise.
pub async fn accept(
    config: Config,
    nsec: Option<String>,
    badge: Option<String>,
    award: Option<String>,
) -> anyhow::Result<()> {
    let nsec = match nsec {
        Some(n) => n,
        None => prompt::nsec("Enter your private key (nsec): ")?,
    };
    let recipient = private_key_from_nsec(&nsec)?;
    let recipient_pub = public_from_private(&recipient)?;
    println!("Recipient: {}", npub_from_public_key(&recipient_pub));

    let badge = match badge {
        Some(b) => b,
        None => prompt::line("Badge definition coordinate (30009:<pubkey>:<identifier>): ")?,
    };
    let reference: DefinitionRef = badge.trim().parse()?;

    let award = match award {
        Some(a) => a,
        None => prompt::line("Award event id (64-char hex): ")?,
    };
    let award_id =
        EventId::from_hex(award.trim()).context("the award event id must be 64 hex characters")?;

    let engine = BadgeEngine::new(config);
    let source = RelayAggregateSource::from_config(engine.config());
    let outcome = tokio::select! {
        result = engine.accept_badge(&recipient, reference, award_id, &source) => result?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("cancelled"),
    };

    report::print_report(&outcome.report);
    report::ensure_published(&outcome.report)?;

    println!();
    println!("Badge accepted.");
    println!("  Profile badges event id: {}", outcome.event.id);
    println!("  Badges now displayed:    {}", outcome.total_badges);
    Ok(())
}
