use crate::view;
use rankscore_core::game::ports::{GameObserver, Notifier, Severity};
use rankscore_core::game::state::GameState;
use rankscore_core::model::record::RoundRecord;
use rankscore_core::SeatTable;

/// Prints notices: informational ones to stdout, problems to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Warning | Severity::Error => eprintln!("[{severity}] {message}"),
            Severity::Info | Severity::Success if !self.quiet => println!("{message}"),
            _ => {}
        }
    }
}

/// Redraws the parts of the scoreboard that changed.
#[derive(Debug, Default)]
pub struct ScoreboardPrinter {
    names: SeatTable<String>,
    show_restored: bool,
}

impl ScoreboardPrinter {
    /// A printer that also draws the full scoreboard when first attached.
    pub fn with_banner() -> Self {
        Self {
            show_restored: true,
            ..Self::default()
        }
    }
}

impl GameObserver for ScoreboardPrinter {
    fn round_committed(&mut self, record: &RoundRecord) {
        let scores = SeatTable::from_fn(|seat| {
            format!("{} {:+}", self.names[seat], record.scores[seat])
        });
        println!(
            "Round {} ({}): {}",
            record.round_number,
            record.duration_label,
            [scores.north, scores.east, scores.south, scores.west].join(" | ")
        );
    }

    fn totals_changed(&mut self, totals: &SeatTable<i32>) {
        let line = SeatTable::from_fn(|seat| format!("{} {}", self.names[seat], totals[seat]));
        println!(
            "Totals: {}",
            [line.north, line.east, line.south, line.west].join(" | ")
        );
    }

    fn state_restored(&mut self, state: &GameState) {
        self.names = state.players().map(|_, player| player.name.clone());
        if self.show_restored {
            print!("{}", view::status(state, state.timer().elapsed_seconds));
        }
    }
}
