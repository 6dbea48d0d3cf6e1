use core_types::Trade;
use core_types::numeric::finite_or;

/// Resolves the single net P&L figure every aggregate is built from.
///
/// Until a trade is reviewed its commission and net fields are not final, so
/// the gross amount is used as-is. A reviewed trade prefers its explicit net
/// figure and otherwise subtracts the commission (0 when absent) from gross.
pub fn net_pnl(trade: &Trade) -> f64 {
    let gross = finite_or(trade.pnl_amount, 0.0);

    if !trade.is_reviewed() {
        return gross;
    }

    match trade.net_pnl.filter(|n| n.is_finite()) {
        Some(net) => net,
        None => gross - trade.commission.map_or(0.0, |c| finite_or(c, 0.0)),
    }
}
