//! Line-oriented date-range selection on standard input

use crate::dashboard::Dashboard;
use crate::output::OutputWriter;
use crate::view::DashboardView;
use bikeshare_common::{truncate_string, DashboardError, DateRange, Result};
use chrono::NaiveDate;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

/// Help shown for the `help` command and after an unknown command
pub const HELP_TEXT: &str = "\
Commands:
  <start> <end>          select a date range (YYYY-MM-DD YYYY-MM-DD)
  range <start> <end>    same as above
  day <date>             select a single day
  all | reset            select the whole dataset
  help                   show this help
  quit | exit            leave the session";

const ECHO_LIMIT: usize = 40;

/// One parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Select a date range
    Select(DateRange),
    /// Select the whole dataset
    Reset,
    /// Show the command list
    Help,
    /// End the session
    Quit,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DashboardError::validation_field(
            format!("'{}' is not a YYYY-MM-DD date", truncate_string(raw, ECHO_LIMIT)),
            "date",
        )
    })
}

fn parse_range(start: &str, end: &str) -> Result<DateRange> {
    DateRange::new(parse_date(start)?, parse_date(end)?)
}

impl FromStr for Command {
    type Err = DashboardError;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let lowered: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
        let keyword: Vec<&str> = lowered.iter().map(String::as_str).collect();

        match keyword.as_slice() {
            ["all" | "reset"] => Ok(Self::Reset),
            ["help" | "?"] => Ok(Self::Help),
            ["quit" | "exit"] => Ok(Self::Quit),
            ["day", _] => Ok(Self::Select(DateRange::single_day(parse_date(words[1])?))),
            ["range", _, _] => parse_range(words[1], words[2]).map(Self::Select),
            [_, _] => parse_range(words[0], words[1]).map(Self::Select),
            _ => Err(DashboardError::validation(format!(
                "unknown command '{}'",
                truncate_string(line.trim(), ECHO_LIMIT)
            ))),
        }
    }
}

/// Parse a line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    line.parse().map(Some)
}

/// Counters for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Views rendered and written
    pub rendered: usize,
    /// Lines rejected or selections that failed
    pub errors: usize,
}

/// Reads commands, renders each selection and writes it out
pub struct Session<'a> {
    dashboard: &'a Dashboard,
    writer: &'a OutputWriter,
}

impl<'a> Session<'a> {
    /// Create a session over a dashboard and its output writer
    pub const fn new(dashboard: &'a Dashboard, writer: &'a OutputWriter) -> Self {
        Self { dashboard, writer }
    }

    /// Render `range` and write the outputs, returning a status line
    pub async fn select(&self, range: DateRange) -> Result<String> {
        let view = self.dashboard.on_date_range_changed(range)?;
        let report = self.writer.write(&view).await?;
        let page = report
            .page()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Ok(match &view {
            DashboardView::Ready(page_view) => format!(
                "{}: {} day(s) -> {page}",
                page_view.summary.range,
                view.record_count()
            ),
            DashboardView::Empty(_) => format!("{range}: no data in range -> {page}"),
        })
    }

    /// Process commands until `quit`, `exit` or end of input.
    ///
    /// Fatal errors end the session; anything else is reported on `output`
    /// and the session continues.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<SessionStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = SessionStats::default();
        let mut lines = input.lines();
        info!("Waiting for date-range commands");
        output
            .write_all(
                format!(
                    "Language: {}. Type 'help' for commands.\n",
                    self.dashboard.locale().display_name()
                )
                .as_bytes(),
            )
            .await?;

        while let Some(line) = lines.next_line().await? {
            debug!(line = %line, "Received command line");
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    stats.errors += 1;
                    output
                        .write_all(format!("error: {err}\n{HELP_TEXT}\n").as_bytes())
                        .await?;
                    continue;
                }
            };

            let range = match command {
                Command::Quit => break,
                Command::Help => {
                    output.write_all(format!("{HELP_TEXT}\n").as_bytes()).await?;
                    continue;
                }
                Command::Reset => self.dashboard.full_range(),
                Command::Select(range) => range,
            };

            match self.select(range).await {
                Ok(status) => {
                    stats.rendered += 1;
                    output.write_all(format!("{status}\n").as_bytes()).await?;
                }
                Err(err) if err.is_fatal() => {
                    error!(error = %err, "Fatal error during session");
                    return Err(err);
                }
                Err(err) => {
                    stats.errors += 1;
                    output.write_all(format!("error: {err}\n").as_bytes()).await?;
                }
            }
            output.flush().await?;
        }

        let cache = self.dashboard.cache_stats();
        debug!(
            hits = cache.hits,
            misses = cache.misses,
            hit_rate = cache.hit_rate(),
            "Summary cache usage"
        );
        info!(rendered = stats.rendered, errors = stats.errors, "Session ended");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_common::test_utils::{date, range};

    #[test]
    fn test_parse_ranges() {
        let expected = Command::Select(range(date(2011, 1, 1), date(2011, 3, 31)));
        assert_eq!(parse_command("2011-01-01 2011-03-31").unwrap(), Some(expected));
        assert_eq!(parse_command("  RANGE 2011-01-01   2011-03-31 ").unwrap(), Some(expected));
        assert_eq!(
            parse_command("day 2012-02-29").unwrap(),
            Some(Command::Select(DateRange::single_day(date(2012, 2, 29))))
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("all").unwrap(), Some(Command::Reset));
        assert_eq!(parse_command("Reset").unwrap(), Some(Command::Reset));
        assert_eq!(parse_command("help").unwrap(), Some(Command::Help));
        assert_eq!(parse_command("EXIT").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_command("2011-03-31 2011-01-01"),
            Err(DashboardError::InvalidRange { .. })
        ));
        assert!(matches!(
            parse_command("2011-13-01 2011-12-01"),
            Err(DashboardError::Validation { .. })
        ));
        assert!(matches!(
            parse_command("plot everything now please"),
            Err(DashboardError::Validation { .. })
        ));
    }
}
