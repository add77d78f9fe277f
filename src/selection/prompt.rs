use super::{SelectionAction, SelectionOutcome, SelectionState, SelectionView};
use crate::results::Deal;
use std::io::{self, BufRead, Write};

const HELP: &str = "Commands: /text filter (/ clears), numbers toggle shown rows (1 3 5-7), \
                    a check shown, n clear, c capture, q cancel";

/// Parse one input line into actions.
///
/// Row numbers are the 1-indexed scan positions shown in the listing.
/// Numbers of rows hidden by the current filter have no effect.
pub fn parse_command(line: &str) -> Result<Vec<SelectionAction>, String> {
    let line = line.trim();

    if let Some(term) = line.strip_prefix('/') {
        return Ok(vec![SelectionAction::Filter(term.trim().to_string())]);
    }

    match line.to_lowercase().as_str() {
        "" => return Ok(Vec::new()),
        "a" | "all" => return Ok(vec![SelectionAction::CheckVisible]),
        "n" | "none" => return Ok(vec![SelectionAction::Clear]),
        "c" | "capture" | "confirm" => return Ok(vec![SelectionAction::Confirm]),
        "q" | "quit" | "cancel" => return Ok(vec![SelectionAction::Cancel]),
        _ => {}
    }

    let mut actions = Vec::new();
    let tokens = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());
    for token in tokens {
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_number(a)?, parse_number(b)?),
            None => {
                let n = parse_number(token)?;
                (n, n)
            }
        };
        if start > end {
            return Err(format!("Invalid range '{}'", token));
        }
        actions.extend((start..=end).map(|n| SelectionAction::Toggle(n - 1)));
    }
    Ok(actions)
}

fn parse_number(token: &str) -> Result<usize, String> {
    match token.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Unknown command '{}'", token)),
    }
}

/// Write the visible rows of a view
pub fn render<W: Write>(view: &SelectionView, out: &mut W) -> io::Result<()> {
    let shown = view.visible_rows().count();
    writeln!(out)?;
    if view.filter.trim().is_empty() {
        writeln!(
            out,
            "Select deals to capture ({} deals, {} checked)",
            view.rows.len(),
            view.checked_count()
        )?;
    } else {
        writeln!(
            out,
            "Select deals to capture (filter \"{}\": {} of {} shown, {} checked)",
            view.filter.trim(),
            shown,
            view.rows.len(),
            view.checked_count()
        )?;
    }

    for row in view.visible_rows() {
        writeln!(
            out,
            "  [{}] {:>3}. p{:<4} {}{}",
            if row.checked { 'x' } else { ' ' },
            row.index + 1,
            row.page,
            row.title,
            if row.has_thumbnail { "  [preview]" } else { "" }
        )?;
    }
    if shown == 0 {
        writeln!(out, "  (no deals match)")?;
    }
    writeln!(out, "{}", HELP)?;
    write!(out, "> ")?;
    out.flush()
}

/// Run an interactive selection over `input`/`output`.
///
/// Returns the chosen deals in scan order, or `None` if the user cancelled
/// or the input ended.
pub fn run<P, R, W>(
    deals: &[Deal<P>],
    input: R,
    output: &mut W,
) -> io::Result<Option<Vec<Deal<P>>>>
where
    P: Clone,
    R: BufRead,
    W: Write,
{
    let mut state = SelectionState::new();
    render(&state.view(deals), output)?;

    for line in input.lines() {
        let line = line?;
        let actions = match parse_command(&line) {
            Ok(actions) => actions,
            Err(message) => {
                writeln!(output, "{}", message)?;
                render(&state.view(deals), output)?;
                continue;
            }
        };

        for action in actions {
            ::log::trace!("Selection action {:?}", action);
            match state.apply(action, deals) {
                Some(SelectionOutcome::Confirmed(_)) => {
                    writeln!(output)?;
                    return Ok(Some(state.confirm(deals)));
                }
                Some(SelectionOutcome::Cancelled) => {
                    writeln!(output)?;
                    return Ok(None);
                }
                None => {}
            }
        }
        render(&state.view(deals), output)?;
    }

    ::log::debug!("Selection input closed; cancelling");
    Ok(None)
}
