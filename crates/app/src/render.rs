use relic_core::QuizEvent;
use relic_core::engine::{FinalFeedback, RoundReady};
use relic_core::model::CorrectYear;
use storage::repository::SessionSummaryRow;

/// Player-facing year: negative years read as BCE.
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", year.unsigned_abs())
    } else {
        format!("{year} CE")
    }
}

pub fn format_correct_year(year: CorrectYear) -> String {
    match year {
        CorrectYear::Exact(year) => format_year(year),
        CorrectYear::Range { lower, upper } => {
            format!("{} to {}", format_year(lower), format_year(upper))
        }
    }
}

fn mark(correct: bool) -> &'static str {
    if correct { "correct" } else { "wrong" }
}

fn render_round(ready: &RoundReady) -> String {
    let mut out = format!("\n== Round {} ==\nImage: {}\n", ready.round_number, ready.image_ref);
    for (idx, choice) in ready.choices.iter().enumerate() {
        out.push_str(&format!("  {}. {choice}\n", idx + 1));
    }
    out.push_str(&format!(
        "Lives: {}  Year guess: {}",
        ready.lives_remaining,
        format_year(ready.year_guess)
    ));
    if let Some(secs) = ready.time_limit_secs {
        out.push_str(&format!("  Time: {secs}s"));
    }
    out
}

fn render_final(feedback: &FinalFeedback) -> String {
    let mut out = String::new();
    if feedback.timed_out {
        out.push_str("Time's up!\n");
    }
    if feedback.is_perfect() {
        out.push_str("Perfect!\n");
    }
    let answer = feedback.selected_answer.as_deref().unwrap_or("(none)");
    out.push_str(&format!(
        "Object: {answer} ({}), answer: {}\n",
        mark(feedback.object_correct),
        feedback.correct_answer
    ));
    out.push_str(&format!(
        "Year: {} ({}), actual: {}",
        format_year(feedback.year_guess),
        mark(feedback.year_correct),
        format_correct_year(feedback.correct_year)
    ));
    if !feedback.year_correct {
        let unit = if feedback.year_diff == 1 { "year" } else { "years" };
        out.push_str(&format!(", off by {} {unit}", feedback.year_diff));
    }
    out.push('\n');
    out.push_str(&format!(
        "Points: {} object + {} year = {}  Total: {}",
        feedback.points.object,
        feedback.points.year,
        feedback.points_earned,
        feedback.cumulative_score
    ));
    out
}

/// Text for one event, or `None` for events the terminal ignores.
pub fn render_event(event: &QuizEvent) -> Option<String> {
    match event {
        QuizEvent::RoundReady(ready) => Some(render_round(ready)),
        QuizEvent::PartialFeedback(partial) => Some(format!(
            "Object {}, year {}. Lives left: {}",
            mark(partial.object_correct),
            mark(partial.year_correct),
            partial.lives_remaining
        )),
        QuizEvent::FinalFeedback(feedback) => Some(render_final(feedback)),
        QuizEvent::ReadyForNextRound { round_count } => {
            Some(format!("Round {round_count} done. Type n for the next round."))
        }
        QuizEvent::SessionComplete(done) => Some(format!(
            "Session complete: {} / {} over {} rounds. Type a to play again.",
            done.final_score, done.max_score, done.rounds_played
        )),
        QuizEvent::TimerTick { remaining_secs }
            if *remaining_secs <= 10 || *remaining_secs % 15 == 0 =>
        {
            Some(format!("{remaining_secs}s left"))
        }
        QuizEvent::TimerTick { .. } => None,
    }
}

pub fn render_history(rows: &[SessionSummaryRow]) -> String {
    if rows.is_empty() {
        return "No finished sessions yet.".to_owned();
    }
    let mut out = String::from("Recent sessions:");
    for row in rows {
        let summary = &row.summary;
        out.push_str(&format!(
            "\n  #{} {}  {} / {} ({} rounds)",
            row.id,
            summary.completed_at().format("%Y-%m-%d %H:%M"),
            summary.final_score(),
            summary.max_score(),
            summary.rounds_played()
        ));
    }
    out
}
