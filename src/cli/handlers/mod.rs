use std::collections::HashSet;
use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::storage::FileStorage;
use crate::io::{config_io, paths, recovery};
use crate::model::config::{Config, ThemeMode};
use crate::model::tag::{NewTag, TagColor, TagPatch};
use crate::model::task::{NewTask, Scope, TaskPatch};
use crate::ops::agenda::{Agenda, parse_date};
use crate::ops::reducer::TaskError;
use crate::ops::search;
use crate::ops::tags::TagError;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = paths::data_dir(cli.data_dir.as_deref().map(Path::new));
    let today = Local::now().date_naive();
    let date = match cli.date.as_deref() {
        Some(raw) => parse_date(raw, today).ok_or_else(|| {
            format!(
                "invalid date '{}' (expected YYYY-MM-DD, today, tomorrow, yesterday, +N or -N)",
                raw
            )
        })?,
        None => today,
    };

    match cli.command {
        None => Err("no subcommand given (try `dl --help`)".into()),
        Some(cmd) => match cmd {
            // Commands that don't need the stores
            Commands::Theme(args) => cmd_theme(&dir, args),
            Commands::Recovery(args) => cmd_recovery(&dir, args, json),
            Commands::Days => cmd_days(&dir, json),

            // Read commands
            Commands::List => cmd_list(&open_agenda(&dir, date)?, today, json),
            Commands::Search(args) => cmd_search(&open_agenda(&dir, date)?, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&mut open_agenda(&dir, date)?, args),
            Commands::Edit(args) => cmd_edit(&mut open_agenda(&dir, date)?, args),
            Commands::Toggle(args) => cmd_toggle(&mut open_agenda(&dir, date)?, args),
            Commands::Rm(args) => cmd_rm(&mut open_agenda(&dir, date)?, args),

            // Tag management
            Commands::Tag(args) => cmd_tag(&mut open_agenda(&dir, date)?, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(dir: &Path) -> Result<Config, config_io::ConfigError> {
    config_io::read_config(dir).map(|(config, _doc)| config)
}

fn open_agenda(dir: &Path, date: NaiveDate) -> Result<Agenda<FileStorage>, Box<dyn std::error::Error>> {
    let config = load_config(dir)?;
    let storage = FileStorage::open(dir)?;
    Ok(Agenda::open(storage, date, &config.tags)?)
}

fn scope_of(global: bool) -> Scope {
    if global { Scope::Global } else { Scope::Daily }
}

/// Resolve a full id or a unique id prefix within one scope
fn resolve_task_id(agenda: &Agenda<FileStorage>, scope: Scope, id: &str) -> Result<String, TaskError> {
    let tasks = match scope {
        Scope::Daily => agenda.tasks(),
        Scope::Global => agenda.global_tasks(),
    };
    if tasks.iter().any(|t| t.id == id) {
        return Ok(id.to_string());
    }
    let mut matches = tasks.iter().filter(|t| t.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(task), None) if !id.is_empty() => Ok(task.id.clone()),
        _ => Err(TaskError::NotFound(id.to_string())),
    }
}

/// A `--tag` value: a tag name or id, or "none" for no tag
fn resolve_tag_arg(agenda: &Agenda<FileStorage>, name: &str) -> Result<Option<String>, TagError> {
    if let Some(tag) = agenda.tags().resolve(name) {
        return Ok(Some(tag.id.clone()));
    }
    if name.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Err(TagError::NotFound(name.to_string()))
}

fn resolve_tag_id(agenda: &Agenda<FileStorage>, name_or_id: &str) -> Result<String, TagError> {
    agenda
        .tags()
        .resolve(name_or_id)
        .map(|t| t.id.clone())
        .ok_or_else(|| TagError::NotFound(name_or_id.to_string()))
}

fn parse_color(s: &str) -> Result<TagColor, Box<dyn std::error::Error>> {
    Ok(s.parse::<TagColor>()?)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(agenda: &Agenda<FileStorage>, today: NaiveDate, json: bool) -> CmdResult {
    let tags = agenda.tags();
    if json {
        let day = DayJson {
            date: agenda.date().to_string(),
            tasks: agenda
                .tasks()
                .iter()
                .map(|t| task_to_json(t, Scope::Daily, tags))
                .collect(),
            global: agenda
                .visible_globals()
                .into_iter()
                .map(|t| task_to_json(t, Scope::Global, tags))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&day)?);
        return Ok(());
    }

    println!("{}", format_day_header(agenda.date()));
    println!();
    if agenda.tasks().is_empty() {
        println!("{}", empty_day_message(agenda.date(), today));
    }
    for task in agenda.tasks() {
        for line in format_task_detail(task, tags) {
            println!("{}", line);
        }
    }

    let globals = agenda.visible_globals();
    if !globals.is_empty() {
        println!();
        println!("-- Global --");
        for task in globals {
            for line in format_task_detail(task, tags) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn cmd_days(dir: &Path, json: bool) -> CmdResult {
    let dates = FileStorage::open(dir)?.stored_dates()?;
    if json {
        let out: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for date in dates {
        println!("{}  {}", date, date.format("%a"));
    }
    Ok(())
}

fn cmd_search(agenda: &Agenda<FileStorage>, args: SearchArgs, json: bool) -> CmdResult {
    let re = search::build_pattern(&args.pattern)?;
    let hits = search::search_agenda(agenda, &re);

    if json {
        let out: Vec<SearchHitJson> = hits
            .iter()
            .filter_map(|hit| {
                let (_, task) = agenda.find(&hit.task_id)?;
                Some(hit_to_json(hit, &task.title))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    // One line per task, even when several fields matched
    let mut seen = HashSet::new();
    for hit in &hits {
        if seen.insert(&hit.task_id)
            && let Some((scope, task)) = agenda.find(&hit.task_id)
        {
            let marker = match scope {
                Scope::Daily => "day",
                Scope::Global => "global",
            };
            println!("[{}] {}", marker, format_task_line(task, agenda.tags()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(agenda: &mut Agenda<FileStorage>, args: AddArgs) -> CmdResult {
    let tag = match args.tag.as_deref() {
        Some(name) => resolve_tag_arg(agenda, name)?,
        None => None,
    };
    let data = NewTask {
        title: args.title,
        description: args.description.unwrap_or_default(),
        tag,
    };
    let id = agenda.add(scope_of(args.global), data)?;
    println!("{}", id);
    Ok(())
}

fn cmd_edit(agenda: &mut Agenda<FileStorage>, args: EditArgs) -> CmdResult {
    let scope = scope_of(args.global);
    let id = resolve_task_id(agenda, scope, &args.id)?;
    let tag = match args.tag.as_deref() {
        Some(name) => Some(resolve_tag_arg(agenda, name)?),
        None => None,
    };
    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        tag,
        is_completed: args.done,
    };
    if patch.is_empty() {
        return Err("nothing to change (use --title, --desc, --tag or --done)".into());
    }
    agenda.edit(scope, &id, patch)?;
    println!("{} updated", short_id(&id));
    Ok(())
}

fn cmd_toggle(agenda: &mut Agenda<FileStorage>, args: TaskIdArgs) -> CmdResult {
    let scope = scope_of(args.global);
    let id = resolve_task_id(agenda, scope, &args.id)?;
    let done = agenda.toggle(scope, &id)?;
    println!("{} {}", short_id(&id), if done { "done" } else { "open" });
    Ok(())
}

fn cmd_rm(agenda: &mut Agenda<FileStorage>, args: TaskIdArgs) -> CmdResult {
    let scope = scope_of(args.global);
    let id = resolve_task_id(agenda, scope, &args.id)?;
    let removed = agenda.remove(scope, &id)?;
    println!("removed {} {}", short_id(&removed.id), removed.title);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

fn cmd_tag(agenda: &mut Agenda<FileStorage>, args: TagCmd, json: bool) -> CmdResult {
    match args.action {
        TagAction::List => {
            let tags = agenda.tags().tags();
            if json {
                let out: Vec<TagJson> = tags.iter().map(tag_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                if tags.is_empty() {
                    println!("(no tags)");
                }
                for tag in tags {
                    println!("{}", format_tag_line(tag));
                }
            }
        }
        TagAction::Add(add) => {
            let color = match add.color.as_deref() {
                Some(c) => parse_color(c)?,
                None => TagColor::random(),
            };
            let data = NewTag {
                name: add.name.clone(),
                color,
            };
            match agenda.add_tag(data)? {
                Some(id) => println!("{}", id),
                None => println!("tag {} already exists", add.name.trim()),
            }
        }
        TagAction::Edit(edit) => {
            let id = resolve_tag_id(agenda, &edit.id)?;
            let patch = TagPatch {
                name: edit.name,
                color: edit.color.as_deref().map(parse_color).transpose()?,
            };
            if patch.name.is_none() && patch.color.is_none() {
                return Err("nothing to change (use --name or --color)".into());
            }
            agenda.edit_tag(&id, patch)?;
            if let Some(tag) = agenda.tag(&id) {
                println!("{}", format_tag_line(tag));
            }
        }
        TagAction::Rm(rm) => {
            let id = resolve_tag_id(agenda, &rm.id)?;
            let removed = agenda.remove_tag(&id)?;
            println!("removed tag {}", removed.name);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

fn cmd_theme(dir: &Path, args: ThemeArgs) -> CmdResult {
    let current = load_config(dir)?.ui.theme;
    let next = match args.mode.as_deref() {
        None => {
            println!("{}", current);
            return Ok(());
        }
        Some("toggle") => current.toggled(),
        Some(mode) => ThemeMode::parse_mode(mode)
            .ok_or_else(|| format!("unknown theme '{}' (expected: light, dark, toggle)", mode))?,
    };
    std::fs::create_dir_all(dir)?;
    config_io::save_theme(dir, next)?;
    println!("{}", next);
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(dir: &Path, args: RecoveryArgs, json: bool) -> CmdResult {
    match args.action {
        Some(RecoveryAction::Path) => {
            let dir = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
            println!("{}", recovery::recovery_log_path(&dir).display());
        }
        Some(RecoveryAction::Prune) => {
            let removed = recovery::prune_recovery(dir, None, false)?;
            println!("pruned {} entries", removed);
        }
        None => {
            let entries = recovery::read_recovery_entries(dir, Some(args.limit.unwrap_or(10)));
            if json {
                let out: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if entries.is_empty() {
                println!("(recovery log is empty)");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_display_markdown());
                }
            }
        }
    }
    Ok(())
}
