use core_types::Outcome;
use serde::{Deserialize, Serialize};

/// Consecutive win and loss runs in a chronological outcome sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub longest_win: usize,
    pub longest_loss: usize,
    pub average_win: f64,
    pub average_loss: f64,
    /// Every completed win run, in the order they ended.
    pub win_runs: Vec<usize>,
    pub loss_runs: Vec<usize>,
}

/// Scans outcomes once. A run ends at the opposite outcome or at a breakeven,
/// which ends both kinds of run; whatever is still open at the end is recorded too.
pub fn detect_streaks(outcomes: impl IntoIterator<Item = Outcome>) -> StreakSummary {
    let mut win_runs = Vec::new();
    let mut loss_runs = Vec::new();
    let mut current_win = 0usize;
    let mut current_loss = 0usize;

    for outcome in outcomes {
        match outcome {
            Outcome::Win => {
                current_win += 1;
                close(&mut current_loss, &mut loss_runs);
            }
            Outcome::Loss => {
                current_loss += 1;
                close(&mut current_win, &mut win_runs);
            }
            Outcome::Breakeven => {
                close(&mut current_win, &mut win_runs);
                close(&mut current_loss, &mut loss_runs);
            }
        }
    }
    close(&mut current_win, &mut win_runs);
    close(&mut current_loss, &mut loss_runs);

    StreakSummary {
        longest_win: win_runs.iter().copied().max().unwrap_or(0),
        longest_loss: loss_runs.iter().copied().max().unwrap_or(0),
        average_win: mean_length(&win_runs),
        average_loss: mean_length(&loss_runs),
        win_runs,
        loss_runs,
    }
}

/// Records an open run and resets it.
fn close(run: &mut usize, history: &mut Vec<usize>) {
    if *run > 0 {
        history.push(*run);
        *run = 0;
    }
}

fn mean_length(runs: &[usize]) -> f64 {
    if runs.is_empty() {
        0.0
    } else {
        runs.iter().sum::<usize>() as f64 / runs.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Outcome::{Breakeven as B, Loss as L, Win as W};

    #[test]
    fn runs_break_on_opposite_outcome_or_breakeven() {
        let streaks = detect_streaks([W, W, L, B, W, L, L, L]);

        assert_eq!(streaks.longest_win, 2);
        assert_eq!(streaks.longest_loss, 3);
        assert_eq!(streaks.win_runs, vec![2, 1]);
        assert_eq!(streaks.loss_runs, vec![1, 3]);
        assert_eq!(streaks.average_win, 1.5);
        assert_eq!(streaks.average_loss, 2.0);
    }

    #[test]
    fn breakevens_alone_record_nothing() {
        let streaks = detect_streaks([B, B, B]);
        assert_eq!(streaks, StreakSummary::default());
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(detect_streaks(std::iter::empty()), StreakSummary::default());
    }

    #[test]
    fn trailing_run_is_flushed() {
        let streaks = detect_streaks([L, W, W, W]);
        assert_eq!(streaks.win_runs, vec![3]);
        assert_eq!(streaks.loss_runs, vec![1]);
    }
}
