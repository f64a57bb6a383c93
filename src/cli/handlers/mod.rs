mod confirm;

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::controller::{SaveOutcome, Timeline};
use crate::io::config_io;
use crate::io::images::encode_image;
use crate::io::state::{self, UiState};
use crate::io::storage::{self, DocumentSource, Storage, WritePolicy};
use crate::io::transfer;
use crate::model::config::AppConfig;
use crate::model::event::TimelineMeta;
use crate::ops::draft::EventDraft;
use crate::ops::search;
use crate::util::date::DateParts;

use confirm::confirm;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ctx = Context::open(cli.data_dir.as_deref())?;

    match cli.command {
        None => cmd_show(&ctx, ShowArgs::default(), json),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Show(args) => cmd_show(&ctx, args, json),
            Commands::Get(args) => cmd_get(&ctx, args, json),
            Commands::Parents(args) => cmd_parents(&ctx, args, json),
            Commands::Search(args) => cmd_search(&ctx, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args, json),
            Commands::Edit(args) => cmd_edit(&ctx, args),
            Commands::Rm(args) => cmd_rm(&ctx, args),

            // Expansion
            Commands::Toggle(args) => cmd_toggle(&ctx, args),
            Commands::ExpandAll => cmd_expand_all(&ctx),
            Commands::CollapseAll => cmd_collapse_all(&ctx),

            // Backup
            Commands::Export(args) => cmd_export(&ctx, args),
            Commands::Import(args) => cmd_import(&ctx, args),
            Commands::Clear(args) => cmd_clear(&ctx, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Resolved data directory, configuration, and storage for one invocation
struct Context {
    data_dir: PathBuf,
    config: AppConfig,
    storage: Storage,
}

impl Context {
    fn open(explicit: Option<&Path>) -> Result<Self, config_io::ConfigError> {
        let data_dir = config_io::resolve_data_dir(explicit)?;
        let config = config_io::load_config(&data_dir)?;
        let storage = Storage::new(&data_dir, &config.storage.key);
        tracing::debug!(data_dir = %data_dir.display(), "using data directory");
        Ok(Context {
            data_dir,
            config,
            storage,
        })
    }

    /// Load the document and the saved expansion set. A document that was
    /// not read from storage gets the default expansion.
    fn load(&self) -> Timeline {
        let meta = TimelineMeta::fresh(&self.config.app.name, &self.config.app.version);
        let (data, source) =
            storage::load_document(&self.storage, self.config.defaults.url.as_deref(), meta);
        match (source, state::read_ui_state(&self.data_dir)) {
            (DocumentSource::Stored, Some(ui)) => Timeline::with_expansion(data, ui.expanded),
            _ => Timeline::new(data),
        }
    }

    /// Persist the document and the expansion set.
    fn store(&self, timeline: &Timeline, policy: WritePolicy) -> CmdResult {
        self.storage.save(timeline.data(), policy)?;
        self.store_view(timeline)
    }

    /// Persist only the expansion set.
    fn store_view(&self, timeline: &Timeline) -> CmdResult {
        let ui = UiState {
            expanded: timeline.expanded().clone(),
        };
        state::write_ui_state(&self.data_dir, &ui)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, args: ShowArgs, json: bool) -> CmdResult {
    let timeline = ctx.load();
    if json {
        let tree = tree_to_json(timeline.events(), timeline.expanded());
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }
    if timeline.events().is_empty() {
        println!("No events yet. Add one with `vl add <title> --date <date>`.");
        return Ok(());
    }
    println!("{}", render_tree(timeline.events(), timeline.expanded(), args.all));
    Ok(())
}

fn cmd_get(ctx: &Context, args: GetArgs, json: bool) -> CmdResult {
    let timeline = ctx.load();
    let event = timeline
        .find(&args.id)
        .ok_or_else(|| format!("event not found: {}", args.id))?;
    let parent = timeline.parent_of(&args.id);
    if json {
        let detail = EventDetailJson {
            event: event_to_json(event, timeline.expanded()),
            parent,
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", format_event_detail(event, parent.as_deref()));
    }
    Ok(())
}

fn cmd_parents(ctx: &Context, args: ParentsArgs, json: bool) -> CmdResult {
    let timeline = ctx.load();
    let re = args.pattern.as_deref().map(Regex::new).transpose()?;
    let candidates = search::parent_candidates(timeline.events(), re.as_ref(), args.exclude.as_deref());
    if json {
        let out: Vec<FlatEntryJson> = candidates.iter().map(flat_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for entry in &candidates {
            println!("{}", format_flat_entry(entry));
        }
    }
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs, json: bool) -> CmdResult {
    let timeline = ctx.load();
    let re = Regex::new(&args.pattern)?;
    let hits = search::search_events(timeline.events(), &re);
    let title_of = |id: &str| timeline.find(id).map(|e| e.title.clone()).unwrap_or_default();
    if json {
        let out: Vec<SearchHitJson> = hits
            .iter()
            .map(|h| search_hit_to_json(h, &title_of(&h.id)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for hit in &hits {
            println!("{}  [{}]  ({})", title_of(&hit.id), hit.id, match_field_name(hit.field));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

/// Apply date flags on top of the draft's current date
fn apply_date_args(draft: &mut EventDraft, args: &DateArgs) {
    if let Some(date) = &args.date {
        draft.set_date(date);
    }
    let DateParts {
        year,
        month,
        day,
        is_bc,
    } = draft.date;
    let is_bc = if args.bc {
        true
    } else if args.ad {
        false
    } else {
        is_bc
    };
    draft.date = DateParts::new(
        args.year.unwrap_or(year),
        args.month.unwrap_or(month),
        args.day.unwrap_or(day),
        is_bc,
    );
}

fn has_date_args(args: &DateArgs) -> bool {
    args.date.is_some()
        || args.year.is_some()
        || args.month.is_some()
        || args.day.is_some()
        || args.bc
        || args.ad
}

fn attach_images(draft: &mut EventDraft, paths: &[PathBuf]) -> CmdResult {
    for path in paths {
        draft.add_image(encode_image(path)?);
    }
    Ok(())
}

fn report_outcome(outcome: &SaveOutcome, id: &str) -> CmdResult {
    match outcome {
        SaveOutcome::MissingParent(parent) => Err(format!("parent not found: {}", parent).into()),
        SaveOutcome::WouldCycle => {
            Err(format!("cannot move {} under itself or one of its sub-events", id).into())
        }
        _ => Ok(()),
    }
}

fn cmd_add(ctx: &Context, args: AddArgs, json: bool) -> CmdResult {
    let mut timeline = ctx.load();

    let (parent, slot_date) = match &args.after {
        Some(sibling) => {
            let (parent, date) = timeline
                .slot_after(sibling)
                .ok_or_else(|| format!("event not found: {}", sibling))?;
            (parent, Some(date))
        }
        None => (args.parent.clone(), None),
    };

    let mut draft = EventDraft::new(slot_date.as_deref());
    apply_date_args(&mut draft, &args.date);
    draft.title = args.title;
    draft.content = args.content.unwrap_or_default();
    draft.tags = args.tags.unwrap_or_default();
    draft.link = args.link.unwrap_or_default();
    attach_images(&mut draft, &args.images)?;

    let (outcome, id) = timeline.save_draft(&draft, parent.as_deref())?;
    report_outcome(&outcome, &id)?;
    ctx.store(&timeline, WritePolicy::Guarded)?;

    if json {
        println!("{}", serde_json::json!({ "id": id }));
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    let mut timeline = ctx.load();
    let event = timeline
        .find(&args.id)
        .ok_or_else(|| format!("event not found: {}", args.id))?;

    let mut draft = EventDraft::from_event(event);
    if has_date_args(&args.date) {
        apply_date_args(&mut draft, &args.date);
    }
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(content) = args.content {
        draft.content = content;
    }
    if let Some(tags) = args.tags {
        draft.tags = tags;
    }
    if let Some(link) = args.link {
        draft.link = link;
    }
    // highest index first so earlier removals don't shift later ones
    let mut removals = args.remove_images.clone();
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        draft.remove_image(index)?;
    }
    attach_images(&mut draft, &args.images)?;

    let parent = if args.root {
        None
    } else if args.parent.is_some() {
        args.parent.clone()
    } else {
        timeline.parent_of(&args.id)
    };

    let (outcome, id) = timeline.save_draft(&draft, parent.as_deref())?;
    report_outcome(&outcome, &id)?;
    ctx.store(&timeline, WritePolicy::Guarded)?;

    match outcome {
        SaveOutcome::Moved => println!("Moved {}", id),
        _ => println!("Updated {}", id),
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, args: RmArgs) -> CmdResult {
    let mut timeline = ctx.load();
    let event = timeline
        .find(&args.id)
        .ok_or_else(|| format!("event not found: {}", args.id))?;
    let count = event.subtree_len();
    let prompt = format!(
        "Delete \"{}\" and its {} sub-event(s)?",
        event.title,
        count - 1
    );
    if !confirm(&prompt, args.yes)? {
        println!("Cancelled");
        return Ok(());
    }

    timeline.delete(&args.id);
    ctx.store(&timeline, WritePolicy::Force)?;
    println!("Deleted {} event(s)", count);
    Ok(())
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

fn cmd_toggle(ctx: &Context, args: ToggleArgs) -> CmdResult {
    let mut timeline = ctx.load();
    let event = timeline
        .find(&args.id)
        .ok_or_else(|| format!("event not found: {}", args.id))?;
    if !event.has_children() {
        return Err(format!("{} has no sub-events", args.id).into());
    }
    let open = timeline.toggle(&args.id);
    ctx.store_view(&timeline)?;
    println!("{} {}", if open { "Expanded" } else { "Collapsed" }, args.id);
    Ok(())
}

fn cmd_expand_all(ctx: &Context) -> CmdResult {
    let mut timeline = ctx.load();
    timeline.expand_all();
    ctx.store_view(&timeline)?;
    println!("Expanded {} event(s)", timeline.expanded().len());
    Ok(())
}

fn cmd_collapse_all(ctx: &Context) -> CmdResult {
    let mut timeline = ctx.load();
    timeline.collapse_all();
    ctx.store_view(&timeline)?;
    println!("Collapsed all events");
    Ok(())
}

// ---------------------------------------------------------------------------
// Backup
// ---------------------------------------------------------------------------

fn cmd_export(ctx: &Context, args: ExportArgs) -> CmdResult {
    let timeline = ctx.load();
    let dir = args
        .dir
        .or_else(|| ctx.config.export.dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = transfer::export_to(&dir, timeline.data())?;
    println!("Exported {} event(s) to {}", timeline.data().event_count(), path.display());
    Ok(())
}

fn cmd_import(ctx: &Context, args: ImportArgs) -> CmdResult {
    let mut timeline = ctx.load();
    let data = transfer::import_from(&args.file)?;
    let count = data.event_count();
    timeline.import(data);
    ctx.store(&timeline, WritePolicy::Force)?;
    println!("Imported {} event(s)", count);
    Ok(())
}

fn cmd_clear(ctx: &Context, args: ClearArgs) -> CmdResult {
    let mut timeline = ctx.load();
    if !confirm(
        "Clear the whole timeline? This cannot be undone (export a backup first).",
        args.yes,
    )? {
        println!("Cancelled");
        return Ok(());
    }
    timeline.clear();
    ctx.store(&timeline, WritePolicy::Force)?;
    println!("Timeline cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_at(date: &str) -> EventDraft {
        EventDraft::new(Some(date))
    }

    #[test]
    fn date_flag_replaces_date() {
        let mut draft = draft_at("2000-05-05");
        let args = DateArgs {
            date: Some("-000221-01-01".into()),
            ..Default::default()
        };
        apply_date_args(&mut draft, &args);
        assert_eq!(draft.date, DateParts::new(221, 1, 1, true));
    }

    #[test]
    fn component_flags_override_parts() {
        let mut draft = draft_at("2000-05-05");
        let args = DateArgs {
            year: Some(44),
            month: Some(3),
            bc: true,
            ..Default::default()
        };
        apply_date_args(&mut draft, &args);
        assert_eq!(draft.date, DateParts::new(44, 3, 5, true));
    }

    #[test]
    fn ad_flag_clears_era() {
        let mut draft = draft_at("-000100-01-01");
        let args = DateArgs {
            ad: true,
            ..Default::default()
        };
        apply_date_args(&mut draft, &args);
        assert!(!draft.date.is_bc);
        assert!(has_date_args(&args));
        assert!(!has_date_args(&DateArgs::default()));
    }
}
