//! Charsheet Engine - command-line driver.
//!
//! Each invocation loads one character from the file store, applies a
//! single command and flushes.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use charsheet_domain::{Ability, Character, CharacterClass, CharacterId, HpMethod, LevelUpStep, WizardTransition};
use charsheet_engine::infrastructure::{
    clock::{SystemClock, SystemRandom},
    file_store::FileStore,
    ports::KeyValueStore,
    settings::EngineSettings,
    stored_equipment::StoredEquipment,
};
use charsheet_engine::{CharacterEngine, EnginePorts};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage:
  charsheet-engine new <name> <class> <str> <dex> <con> <int> <wis> <cha>
  charsheet-engine show <id>
  charsheet-engine level <id> [<ability>=<points>...] [subclass=<id>]
  charsheet-engine damage <id> <amount>
  charsheet-engine heal <id> <amount>
  charsheet-engine rest <id> short [dice] | long
  charsheet-engine xp <id> <amount>
  charsheet-engine reset <id>
  charsheet-engine delete <id>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary is usually run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charsheet_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = EngineSettings::from_env();
    tracing::debug!(data_dir = %settings.data_dir.display(), "Using file store");

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(settings.data_dir.clone()));
    let ports = EnginePorts {
        store: store.clone(),
        equipment: Arc::new(StoredEquipment::new(store.clone())),
        random: Arc::new(SystemRandom::new()),
        clock: Arc::new(SystemClock::new()),
        retry: settings.flush_retry.clone(),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("{USAGE}");
    };

    if command == "new" {
        let character = new_character(rest)?;
        let mut engine = CharacterEngine::create(character, ports);
        engine.flush().await?;
        println!("{}", engine.character().id);
        return Ok(());
    }

    let Some((id, rest)) = rest.split_first() else {
        bail!("{USAGE}");
    };
    let id: CharacterId = id.parse().with_context(|| format!("Invalid character id: {id}"))?;

    if command == "delete" {
        CharacterEngine::delete_all(store, id).await?;
        return Ok(());
    }

    let mut engine = CharacterEngine::load(id, ports).await?;
    match command.as_str() {
        "show" => {}
        "level" => level_up(&mut engine, settings.default_hp_method, rest)?,
        "damage" => engine.apply_damage(amount(rest)?, None),
        "heal" => {
            engine.apply_healing(amount(rest)?, None);
        }
        "rest" => match rest.first().map(String::as_str) {
            Some("short") => {
                let dice = match rest.get(1) {
                    Some(dice) => dice.parse().with_context(|| format!("Invalid dice count: {dice}"))?,
                    None => 0,
                };
                let result = engine.short_rest(dice);
                println!("short rest: {} dice, {} hp", result.dice_used, result.hp_restored);
            }
            Some("long") => {
                let result = engine.long_rest();
                println!("long rest: {} hp, {} hit dice", result.hp_restored, result.hit_dice_restored);
            }
            _ => bail!("{USAGE}"),
        },
        "xp" => engine.add_experience(amount(rest)?.into()),
        "reset" => {
            if !engine.reset_to_level_one() {
                println!("already level 1");
            }
        }
        _ => bail!("{USAGE}"),
    }

    print_sheet(&engine);
    engine.flush().await?;
    Ok(())
}

fn new_character(args: &[String]) -> anyhow::Result<Character> {
    let [name, class, scores @ ..] = args else {
        bail!("{USAGE}");
    };
    let class: CharacterClass = class.parse()?;
    let scores: Vec<i32> = scores
        .iter()
        .map(|s| s.parse().with_context(|| format!("Invalid ability score: {s}")))
        .collect::<anyhow::Result<_>>()?;
    let bases: [i32; 6] = scores
        .try_into()
        .map_err(|_| anyhow!("Expected six ability scores"))?;

    Ok(Character::new_level_one(
        name,
        class,
        charsheet_domain::AbilityScores::from_bases(bases),
        chrono::Utc::now(),
    ))
}

fn amount(args: &[String]) -> anyhow::Result<i32> {
    let value = args.first().ok_or_else(|| anyhow!("{USAGE}"))?;
    value.parse().with_context(|| format!("Invalid amount: {value}"))
}

/// Walk the level-up wizard with choices taken from `key=value` arguments.
fn level_up(engine: &mut CharacterEngine, method: HpMethod, args: &[String]) -> anyhow::Result<()> {
    let mut asi: Vec<(Ability, u8)> = Vec::new();
    let mut subclass = None;
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got {arg}"))?;
        if key == "subclass" {
            subclass = Some(value.to_string());
        } else {
            let points = value.parse().with_context(|| format!("Invalid points: {value}"))?;
            asi.push((key.parse()?, points));
        }
    }

    let Some(mut wizard) = engine.open_level_up() else {
        bail!("Already at level 20");
    };
    loop {
        match wizard.current_step() {
            LevelUpStep::Hp => {
                wizard.set_hp_method(method);
                if method == HpMethod::Roll {
                    let rolled = wizard.roll_hp(|sides| engine.roll(sides));
                    tracing::debug!(rolled, "Rolled hit points");
                }
            }
            LevelUpStep::Asi => {
                for (ability, points) in &asi {
                    for _ in 0..*points {
                        wizard.increment_asi(*ability);
                    }
                }
            }
            LevelUpStep::Subclass => {
                if let Some(name) = &subclass {
                    if !wizard.select_subclass(name) {
                        wizard.set_custom_subclass(name);
                    }
                }
            }
            _ => {}
        }

        match wizard.next() {
            WizardTransition::Moved(_) => {}
            WizardTransition::Confirmed(options) => {
                let outcome = engine.commit_level_up(&options)?;
                println!(
                    "level {}: +{} hp ({} retroactive)",
                    outcome.summary.new_level, outcome.hp_gained, outcome.retroactive_hp
                );
                return Ok(());
            }
            WizardTransition::Blocked => {
                bail!("Level-up needs a choice at the {:?} step", wizard.current_step())
            }
        }
    }
}

fn print_sheet(engine: &CharacterEngine) {
    let c = engine.character();
    println!("{} ({}) level {} {}", c.name, c.id, c.level, c.class);
    if let Some(subclass) = &c.subclass {
        println!("  subclass: {subclass}");
    }
    println!(
        "  hp {}/{} (+{} temp), hit dice {}/{}, ac {}",
        c.hp.current,
        c.hp.max,
        c.hp.temp,
        c.hit_dice.remaining,
        c.hit_dice.total,
        engine.armor_class()
    );
    println!("  xp {}, proficiency +{}", c.experience, engine.proficiency_bonus());
    if engine.is_dead() {
        println!("  dead");
    }
}

/// Load `.env` files from the repository root, local overrides first.
fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
