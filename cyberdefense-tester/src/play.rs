//! Interactive terminal match.
use anyhow::{Context, Result, bail};
use colored::Colorize;
use cyberdefense_game::{
    Advance, DefenderAction, MatchTicker, Outcome, TurnEngine, TurnPhase, Verdict,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read one trimmed line; `None` on end of input.
async fn read_line<R>(input: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = input.read_line(&mut line).await.context("reading input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for a player name until input ends. Blank names are refused.
pub async fn prompt_player_name<R, W>(input: &mut R, out: &mut W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write + ?Sized,
{
    write!(out, "Enter your Name: ")?;
    out.flush()?;
    match read_line(input).await? {
        Some(name) if !name.is_empty() => Ok(name),
        _ => bail!("Please enter a valid name to start the match."),
    }
}

fn parse_action(token: &str) -> Option<DefenderAction> {
    token
        .parse::<usize>()
        .ok()
        .and_then(DefenderAction::from_menu_index)
        .or_else(|| token.parse::<DefenderAction>().ok())
}

fn show_turn<W: Write + ?Sized>(out: &mut W, engine: &TurnEngine) -> Result<()> {
    let state = engine.state();
    writeln!(out)?;
    writeln!(
        out,
        "Player: {} | Time: {}s | Defender {} · Attacker {} | Turn {}/{}",
        engine.player_name().bold(),
        engine.elapsed_seconds(),
        state.defender_score().to_string().cyan(),
        state.attacker_score().to_string().red(),
        engine.turn_number(),
        engine.total_turns()
    )?;
    if let Some(scenario) = engine.current_scenario() {
        writeln!(out, "Attacker played: {}", scenario.attacker.yellow().bold())?;
    }
    for (i, action) in DefenderAction::ALL.iter().enumerate() {
        write!(out, "  [{}] {action}", i + 1)?;
    }
    writeln!(out)?;
    write!(out, "Your move: ")?;
    out.flush()?;
    Ok(())
}

fn show_verdict<W: Write + ?Sized>(out: &mut W, verdict: &Verdict) -> Result<()> {
    let message = verdict.message();
    if verdict.correct {
        writeln!(out, "{}", message.green().bold())?;
    } else {
        writeln!(out, "{}", message.red().bold())?;
    }
    write!(out, "[r] see reasoning for all options, [enter] next turn: ")?;
    out.flush()?;
    Ok(())
}

/// Print the final outcome card.
pub fn show_outcome<W: Write + ?Sized>(out: &mut W, outcome: &Outcome) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🏁 Match complete".bright_cyan().bold())?;
    writeln!(
        out,
        "Winner: {} | Defender {} · Attacker {} | {}s",
        outcome.winner_label().bold(),
        outcome.defender_score,
        outcome.attacker_score,
        outcome.elapsed_seconds
    )?;
    writeln!(out, "Awareness level: {}", outcome.awareness_level)?;
    Ok(())
}

/// Drive `engine` from line input until the match completes.
///
/// A ticker keeps the match clock running while the player thinks; it stops
/// with the clock on completion and is dropped with this future otherwise.
pub async fn run_match<R, W>(engine: &mut TurnEngine, input: &mut R, out: &mut W) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: Write + ?Sized,
{
    let _ticker = MatchTicker::spawn(engine.clock());

    loop {
        engine.tick();
        match engine.phase() {
            TurnPhase::AwaitingChoice => {
                show_turn(out, engine)?;
                let Some(token) = read_line(input).await? else {
                    bail!("input closed mid-match");
                };
                let Some(action) = parse_action(&token) else {
                    writeln!(
                        out,
                        "{}",
                        format!("'{token}' is not a defender action").yellow()
                    )?;
                    continue;
                };
                if let Some(verdict) = engine.record_choice(action) {
                    show_verdict(out, &verdict)?;
                }
            }
            TurnPhase::ShowingVerdict => {
                let Some(token) = read_line(input).await? else {
                    bail!("input closed mid-match");
                };
                if token.eq_ignore_ascii_case("r") {
                    if let Some(scenario) = engine.current_scenario() {
                        writeln!(out, "{}", scenario.reasoning)?;
                    }
                    write!(out, "[enter] next turn: ")?;
                    out.flush()?;
                    continue;
                }
                if let Advance::Completed(outcome) = engine.advance()? {
                    for entry in engine.log() {
                        writeln!(out, "{}", entry.dimmed())?;
                    }
                    show_outcome(out, &outcome)?;
                    return Ok(outcome);
                }
            }
            TurnPhase::Completed => {
                let outcome = engine
                    .outcome()
                    .cloned()
                    .context("completed match has no outcome")?;
                return Ok(outcome);
            }
        }
    }
}
