//! Thin command-line seam over the `fo76mine` library.
//!
//! Mirrors `fo76datamine/cli.py`'s subcommand set for the core pipeline
//! (`snapshot`, `list`, `diff`, `search`, `show`, `unreleased`, `stats`,
//! `strings search`, `purge`, `clear`) without its profile/config/report
//! machinery, which `SPEC_FULL.md` §1 keeps out of scope. Every subcommand
//! is a few lines that call straight into the library, in the spirit of
//! `a2kit`'s `commands` module (`build_cli` + one function per subcommand).

use std::path::PathBuf;

use clap::{arg, Command};

use fo76mine::diff::filters::find_unreleased;
use fo76mine::diff::DiffEngine;
use fo76mine::driver;
use fo76mine::store::Store;

fn build_cli() -> Command {
    Command::new("fo76mine")
        .about("Parse, snapshot, and diff the SeventySix master archive.")
        .subcommand_required(true)
        .subcommand(
            Command::new("snapshot")
                .about("Parse an ESM + BA2 pair and persist a new snapshot")
                .arg(arg!(--esm <PATH> "path to SeventySix.esm").required(true))
                .arg(arg!(--ba2 <PATH> "path to the localization BA2").required(true))
                .arg(arg!(--db <PATH> "path to the SQLite database").required(true))
                .arg(arg!(--label <LABEL> "snapshot label").required(false))
                .arg(arg!(--full "also persist raw subrecord bytes").required(false)),
        )
        .subcommand(Command::new("list").about("List all snapshots").arg(arg!(--db <PATH>).required(true)))
        .subcommand(
            Command::new("diff")
                .about("Compare two snapshots")
                .arg(arg!(--db <PATH>).required(true))
                .arg(arg!(--old <ID>).value_parser(clap::value_parser!(i64)).required(true))
                .arg(arg!(--new <ID>).value_parser(clap::value_parser!(i64)).required(true))
                .arg(arg!(--type <TYPE> "restrict to one record type").required(false)),
        )
        .subcommand(
            Command::new("search")
                .about("Search records by name, editor id, or form id")
                .arg(arg!(--db <PATH>).required(true))
                .arg(arg!(--snapshot <ID>).value_parser(clap::value_parser!(i64)).required(false))
                .arg(arg!(<QUERY>).required(true)),
        )
        .subcommand(
            Command::new("show")
                .about("Show full record detail for a form id")
                .arg(arg!(--db <PATH>).required(true))
                .arg(arg!(--snapshot <ID>).value_parser(clap::value_parser!(i64)).required(false))
                .arg(arg!(<FORM_ID>).required(true)),
        )
        .subcommand(
            Command::new("unreleased")
                .about("Scan the latest snapshot for unreleased-content heuristics")
                .arg(arg!(--db <PATH>).required(true)),
        )
        .subcommand(Command::new("stats").about("Record type counts and database size").arg(arg!(--db <PATH>).required(true)))
        .subcommand(
            Command::new("purge")
                .about("Delete old snapshots, keeping the N most recent")
                .arg(arg!(--db <PATH>).required(true))
                .arg(arg!(--keep <N>).value_parser(clap::value_parser!(i64)).required(false).default_value("5")),
        )
        .subcommand(
            Command::new("clear")
                .about("Delete every snapshot in the database")
                .arg(arg!(--db <PATH>).required(true)),
        )
}

fn parse_form_id(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("snapshot", cmd)) => {
            let esm = PathBuf::from(cmd.get_one::<String>("esm").unwrap());
            let ba2 = PathBuf::from(cmd.get_one::<String>("ba2").unwrap());
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let label = cmd
                .get_one::<String>("label")
                .cloned()
                .unwrap_or_else(|| format!("snapshot-{}", esm.file_stem().and_then(|s| s.to_str()).unwrap_or("esm")));
            let full = cmd.get_flag("full");

            let mut store = Store::open(&db)?;
            let id = driver::run_snapshot(&mut store, &esm, &ba2, &label, full)?;
            println!("Snapshot #{id} ({label}) complete. DB size: {} bytes", store.db_size());
        }
        Some(("list", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let store = Store::open(&db)?;
            let snapshots = store.list_snapshots()?;
            if snapshots.is_empty() {
                println!("No snapshots found.");
            }
            for s in snapshots {
                let created = s
                    .created_at_utc()
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| s.created_at.clone());
                println!("{:>4}  {:<30}  {:<20}  {:>10} records  {:>10} strings", s.id, s.label, created, s.record_count, s.string_count);
            }
        }
        Some(("diff", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let old_id = *cmd.get_one::<i64>("old").unwrap();
            let new_id = *cmd.get_one::<i64>("new").unwrap();
            let record_type = cmd.get_one::<String>("type").map(String::as_str);

            let store = Store::open(&db)?;
            let engine = DiffEngine::new(&store);
            let result = engine.compare(old_id, new_id, record_type)?;

            println!("Added: {}  Removed: {}  Modified: {}", result.added.len(), result.removed.len(), result.modified.len());
            for rec in &result.added {
                println!("  + {} {} {}", rec.form_id_hex(), rec.record_type, rec.editor_id.as_deref().unwrap_or(""));
            }
            for rec in &result.removed {
                println!("  - {} {} {}", rec.form_id_hex(), rec.record_type, rec.editor_id.as_deref().unwrap_or(""));
            }
            for (old, new) in &result.modified {
                println!("  ~ {} {} {}", new.form_id_hex(), new.record_type, new.editor_id.as_deref().unwrap_or(""));
                if let Some(changes) = result.field_changes.get(&old.form_id) {
                    for c in changes {
                        println!("      {}: {:?} -> {:?}", c.field_name, c.old_value, c.new_value);
                    }
                }
            }
        }
        Some(("search", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let query = cmd.get_one::<String>("QUERY").unwrap();
            let store = Store::open(&db)?;
            let snapshot_id = resolve_snapshot(&store, cmd.get_one::<i64>("snapshot").copied())?;
            let Some(snapshot_id) = snapshot_id else {
                println!("No snapshots found.");
                return Ok(());
            };
            let results = store.search_records(snapshot_id, query, None, None)?;
            println!("Found {} records:", results.len());
            for rec in results {
                println!("{:<12}  {:<6}  {:<40}  {}", rec.form_id_hex(), rec.record_type, rec.editor_id.unwrap_or_default(), rec.full_name.unwrap_or_default());
            }
        }
        Some(("show", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let form_id_str = cmd.get_one::<String>("FORM_ID").unwrap();
            let Some(form_id) = parse_form_id(form_id_str) else {
                println!("Invalid form id: {form_id_str}");
                return Ok(());
            };
            let store = Store::open(&db)?;
            let snapshot_id = resolve_snapshot(&store, cmd.get_one::<i64>("snapshot").copied())?;
            let Some(snapshot_id) = snapshot_id else {
                println!("No snapshots found.");
                return Ok(());
            };
            let Some(rec) = store.get_record(snapshot_id, form_id)? else {
                println!("Record {form_id_str} not found in snapshot #{snapshot_id}.");
                return Ok(());
            };
            println!("Record {}", rec.form_id_hex());
            println!("  Type:       {}", rec.record_type);
            println!("  Editor ID:  {}", rec.editor_id.unwrap_or_else(|| "(none)".to_string()));
            println!("  Name:       {}", rec.full_name.unwrap_or_else(|| "(none)".to_string()));
            println!("  Flags:      0x{:08X}", rec.flags);
            println!("  Data Hash:  {}", &rec.data_hash[..16.min(rec.data_hash.len())]);
            for f in store.get_decoded_fields(snapshot_id, form_id)? {
                println!("    {:<25} = {} ({})", f.field_name, f.field_value, f.field_type);
            }
        }
        Some(("unreleased", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let store = Store::open(&db)?;
            let Some(snap) = store.get_latest_snapshot()? else {
                println!("No snapshots found.");
                return Ok(());
            };
            let found = find_unreleased(&store, snap.id)?;
            print_bucket("Atomic Shop (ATX_)", &found.atomic_shop);
            print_bucket("Cut/Test Content", &found.cut_test);
            print_bucket("High FormIDs (likely new)", &found.high_form_ids);
            print_bucket("Disabled Quests", &found.disabled_quests);
        }
        Some(("stats", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let store = Store::open(&db)?;
            let Some(snap) = store.get_latest_snapshot()? else {
                println!("No snapshots found.");
                return Ok(());
            };
            println!("Snapshot #{}: {} ({})", snap.id, snap.label, snap.created_at);
            println!("Records: {}  Strings: {}", snap.record_count, snap.string_count);
            println!("DB size: {} bytes", store.db_size());
            for (record_type, count) in store.get_record_type_counts(snap.id)? {
                println!("{record_type:<8}  {count:>8}");
            }
        }
        Some(("purge", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let keep = *cmd.get_one::<i64>("keep").unwrap();
            let mut store = Store::open(&db)?;
            let count = store.purge_old_snapshots(keep)?;
            println!("Deleted {count} old snapshot(s). Kept {keep} most recent.");
        }
        Some(("clear", cmd)) => {
            let db = PathBuf::from(cmd.get_one::<String>("db").unwrap());
            let mut store = Store::open(&db)?;
            let count = store.clear_all_snapshots()?;
            println!("Deleted {count} snapshot(s).");
        }
        _ => unreachable!("clap enforces subcommand_required"),
    }

    Ok(())
}

fn resolve_snapshot(store: &Store, explicit: Option<i64>) -> Result<Option<i64>, fo76mine::store::Error> {
    if let Some(id) = explicit {
        return Ok(Some(id));
    }
    Ok(store.get_latest_snapshot()?.map(|s| s.id))
}

fn print_bucket(title: &str, records: &[fo76mine::store::DbRecord]) {
    if records.is_empty() {
        return;
    }
    println!("\n=== {title} ({} items) ===", records.len());
    for rec in records.iter().take(50) {
        println!("  {}  {:<6}  {:<45}  {}", rec.form_id_hex(), rec.record_type, rec.editor_id.clone().unwrap_or_default(), rec.full_name.clone().unwrap_or_default());
    }
    if records.len() > 50 {
        println!("  ... and {} more", records.len() - 50);
    }
}
