use crate::api::server as api_server;
use crate::cli::opts::*;
use crate::context::AppContext;
use crate::suggest_http::HttpSuggestionService;

use anyhow::{bail, Result};
use chrono::Utc;
use companion_core::{
    breaks_for_day, classes_for_day, daily_streak, filter_by_text, format_duration, grid_rows,
    layout_day, list_attempts, minutes_to_time, request_suggestions, summarize, ClassDraft,
    ClassEntry, CoreError, DayItem, DayOfWeek, DisplayWindow, PlacedItem, SuggestRequest, SLOT_MINUTES,
};

pub async fn run_cli(args: Cli) -> Result<()> {
    let ctx = AppContext::open(&args).await?;
    let res = dispatch(&ctx, args.cmd).await;
    ctx.session.sign_out().await?;
    res
}

async fn dispatch(ctx: &AppContext, cmd: Command) -> Result<()> {
    match cmd {
        Command::Class(cmd) => class_cmd(ctx, cmd).await,
        Command::Timetable { day } => {
            timetable_cmd(ctx, day);
            Ok(())
        }
        Command::Breaks { day } => {
            breaks_cmd(ctx, day);
            Ok(())
        }
        Command::Suggest(cmd) => suggest_cmd(ctx, cmd).await,
        Command::History => history_cmd(ctx).await,
        Command::Api(api) => {
            let addr: std::net::SocketAddr = api.addr.parse()?;
            api_server::run(ctx, addr).await
        }
        // main runs the TUI on its own runtime
        Command::Quiz => bail!("the quiz runs in the terminal UI"),
    }
}

async fn class_cmd(ctx: &AppContext, cmd: ClassCmd) -> Result<()> {
    match cmd {
        ClassCmd::Add(a) => {
            let draft = ClassDraft {
                name: a.name,
                day: a.day,
                start_time: a.start,
                end_time: a.end,
                location: a.location,
                icon_name: a.icon,
            };
            let c = ctx.timetable.add(draft).await?;
            println!("{}", c.id);
        }
        ClassCmd::List { day, query } => {
            let mut classes = ctx.timetable.snapshot();
            if let Some(d) = day {
                classes = classes_for_day(&classes, d);
            }
            if let Some(q) = query {
                classes = filter_by_text(&classes, &q);
            }
            for c in classes {
                println!(
                    "{}\t{}\t{}-{}\t{}\t{}\t{:?}",
                    c.id,
                    c.day.short(),
                    c.start_time,
                    c.end_time,
                    c.name,
                    c.location,
                    c.icon_name
                );
            }
        }
        ClassCmd::Rm { class } => {
            let c = resolve_class(&ctx.timetable.snapshot(), &class)?;
            ctx.timetable.delete(&c.id).await?;
            println!("ok");
        }
    }
    Ok(())
}

fn timetable_cmd(ctx: &AppContext, day: Option<DayOfWeek>) {
    let classes = ctx.timetable.snapshot();
    for d in selected_days(day) {
        println!("{d}");
        for line in grid_lines(&classes, d, &ctx.window, ctx.config.row_height as usize) {
            println!("{line}");
        }
        println!();
    }
}

/// Text rows of one day's grid, `lines_per_row` lines per 30-minute slot,
/// closed by the window's end label.
fn grid_lines(
    classes: &[ClassEntry],
    day: DayOfWeek,
    window: &DisplayWindow,
    lines_per_row: usize,
) -> Vec<String> {
    let lines_per_row = lines_per_row.max(1);
    let rows = grid_rows(window) as usize;
    let placed = layout_day(classes, day, window, lines_per_row as f32);
    let mut out = Vec::with_capacity(rows * lines_per_row + 1);
    for line in 0..rows * lines_per_row {
        let label = if line % lines_per_row == 0 {
            let row = (line / lines_per_row) as u32;
            minutes_to_time(window.start_minutes() + row * SLOT_MINUTES)
        } else {
            String::new()
        };
        out.push(format!("  {label:>5} | {}", cell_text(&placed, line)));
    }
    out.push(format!("  {:>5} |", minutes_to_time(window.end_minutes())));
    out
}

fn cell_text(placed: &[PlacedItem], line: usize) -> String {
    let l = line as f32;
    let Some(p) = placed
        .iter()
        .find(|p| l + 1.0 > p.placement.offset && l < p.placement.offset + p.placement.span)
    else {
        return String::new();
    };
    if line != p.placement.offset.floor() as usize {
        return "  :".to_string();
    }
    match &p.item {
        DayItem::Class(c) => format!("{} ({}-{}, {})", c.name, c.start_time, c.end_time, c.location),
        DayItem::Break(b) => format!("  free {}", format_duration(b.duration_minutes)),
    }
}

fn breaks_cmd(ctx: &AppContext, day: Option<DayOfWeek>) {
    let classes = ctx.timetable.snapshot();
    for d in selected_days(day) {
        for b in breaks_for_day(&classes, d, &ctx.window) {
            println!(
                "{}\t{}-{}\t{}",
                d.short(),
                b.start_time,
                b.end_time,
                format_duration(b.duration_minutes)
            );
        }
    }
}

async fn suggest_cmd(ctx: &AppContext, cmd: SuggestCmd) -> Result<()> {
    let classes = ctx.timetable.snapshot();
    if cmd.dry_run {
        let req = SuggestRequest::from_classes(&classes, cmd.tasks.as_deref(), cmd.style.as_deref())?;
        println!("{}", serde_json::to_string_pretty(&req)?);
        return Ok(());
    }
    let Some(endpoint) = ctx.config.suggest_endpoint.clone() else {
        return Err(CoreError::Config("suggestEndpoint is not set in the config file".into()).into());
    };
    let service = HttpSuggestionService::new(endpoint);
    let resp =
        request_suggestions(&service, &classes, cmd.tasks.as_deref(), cmd.style.as_deref()).await?;
    println!("{}\n", resp.overall_summary);
    for s in resp.suggested_study_times {
        println!("{}\t{}-{}\t{}", s.day, s.start_time, s.end_time, s.reason);
    }
    Ok(())
}

async fn history_cmd(ctx: &AppContext) -> Result<()> {
    let mut attempts = list_attempts(&*ctx.store, &ctx.user.user_id).await?;
    if attempts.is_empty() {
        println!("no quiz attempts yet");
        return Ok(());
    }
    attempts.sort_by_key(|a| std::cmp::Reverse(a.timestamp));
    for a in &attempts {
        let when = a
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{when}\t{}\t{}/{}\t{}",
            a.category_name,
            a.score,
            a.total_questions_attempted,
            a.verdict()
        );
    }

    let s = summarize(&attempts);
    println!(
        "\n{} attempts, {}/{} correct ({:.0}%), {} timed out",
        s.totals.attempts,
        s.totals.correct,
        s.totals.questions,
        s.totals.accuracy() * 100.0,
        s.totals.timed_out
    );
    for (name, t) in &s.per_category {
        println!("  {name}: {:.0}% over {} attempts", t.accuracy() * 100.0, t.attempts);
    }
    println!("streak: {} day(s)", daily_streak(&attempts, Utc::now().date_naive()));
    Ok(())
}

// ===== Helpers =====
fn selected_days(day: Option<DayOfWeek>) -> Vec<DayOfWeek> {
    day.map(|d| vec![d]).unwrap_or_else(|| DayOfWeek::ALL.to_vec())
}

fn resolve_class(classes: &[ClassEntry], sel: &str) -> Result<ClassEntry> {
    if let Some(c) = classes.iter().find(|c| c.id == sel) {
        return Ok(c.clone());
    }
    let by_name: Vec<_> = classes
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(sel))
        .collect();
    match by_name.as_slice() {
        [one] => Ok((*one).clone()),
        [] => bail!("class not found: {sel}"),
        _ => bail!("several classes are named {sel}; use the id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::WallTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn grid_ends_with_closing_label() {
        let window = DisplayWindow::new(WallTime::hm(8, 0), WallTime::hm(10, 0)).unwrap();
        let class = ClassDraft::new("Maths", DayOfWeek::Monday, WallTime::hm(8, 30), WallTime::hm(9, 30))
            .into_entry(&mut StdRng::seed_from_u64(3));
        let lines = grid_lines(&[class], DayOfWeek::Monday, &window, 1);

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("  08:00 |"));
        assert!(lines[1].contains("Maths (08:30-09:30"));
        assert_eq!(lines[2], "  09:00 |   :");
        assert_eq!(lines[4], "  10:00 |");
    }
}
