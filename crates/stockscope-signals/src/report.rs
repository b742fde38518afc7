//! Text and JSON rendering of analysis results.

use stockscope_core::types::SignalTally;

use crate::analysis::StockAnalysis;
use crate::classifier::IndicatorGroup;
use crate::trend::TrendSnapshot;

const HEAVY_RULE: &str = "═══════════════════════════════════════════════════════════\n";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────────────\n";

/// Two decimals, or `N/A` when undefined.
fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

fn fmt_tally(tally: &SignalTally) -> String {
    format!(
        "BUY {}  SELL {}  NEUTRAL {}",
        tally.buy, tally.sell, tally.neutral
    )
}

fn push_group(s: &mut String, title: &str, group: &IndicatorGroup) {
    s.push_str(title);
    s.push('\n');
    s.push_str(LIGHT_RULE);
    for result in group.indicators() {
        s.push_str(&format!(
            "  {:<38} {:>10}  {}\n",
            result.name,
            fmt_value(result.value),
            result.signal
        ));
    }
    s.push_str(&format!("  Summary: {}\n", fmt_tally(&group.tally())));
    s.push('\n');
}

impl StockAnalysis {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(HEAVY_RULE);
        s.push_str("                  TECHNICAL ANALYSIS REPORT                 \n");
        s.push_str(HEAVY_RULE);
        s.push('\n');

        s.push_str("STOCK\n");
        s.push_str(LIGHT_RULE);
        s.push_str(&format!("  Symbol:              {}\n", self.stock.symbol));
        s.push_str(&format!("  Name:                {}\n", self.stock.name));
        s.push_str(&format!(
            "  Latest Close:        {:.2}\n",
            self.stock.latest_close
        ));
        s.push_str(&format!("  Date:                {}\n", self.stock.latest_date));
        s.push('\n');

        push_group(&mut s, "OSCILLATORS", &self.oscillators);
        push_group(&mut s, "MOVING AVERAGES", &self.moving_averages);

        s.push_str("OVERALL\n");
        s.push_str(LIGHT_RULE);
        s.push_str(&format!("  {}\n", fmt_tally(&self.overall)));
        s.push('\n');

        s.push_str(HEAVY_RULE);

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Render trend snapshots as a fixed-width table, oldest first.
pub fn trend_table(snapshots: &[TrendSnapshot]) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "{:<10} {:>9} {:>12} {:>9} {:>9} {:>9} {:>8} {:>8} {:>7} {:>7} {:>7}  {}\n",
        "Date", "Close", "Volume", "MA5", "MA10", "MA20", "DIF", "DEA", "K", "D", "RSI6", "Events"
    ));

    for snap in snapshots {
        let ind = &snap.indicators;
        let mut events = Vec::new();
        if snap.flags.macd_golden_cross {
            events.push("MACD cross");
        }
        if snap.flags.kdj_golden_cross {
            events.push("KDJ cross");
        }
        if snap.flags.rsi_rebound {
            events.push("RSI rebound");
        }
        if snap.flags.ma_bullish {
            events.push("MA bullish");
        }

        s.push_str(&format!(
            "{:<10} {:>9.2} {:>12} {:>9} {:>9} {:>9} {:>8} {:>8} {:>7} {:>7} {:>7}  {}\n",
            snap.date.to_string(),
            snap.close,
            snap.volume,
            fmt_value(ind.ma5),
            fmt_value(ind.ma10),
            fmt_value(ind.ma20),
            fmt_value(ind.dif),
            fmt_value(ind.dea),
            fmt_value(ind.k),
            fmt_value(ind.d),
            fmt_value(ind.rsi6),
            events.join(", ")
        ));
    }

    s
}

/// Export trend snapshots to JSON.
pub fn trend_to_json(snapshots: &[TrendSnapshot]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshots)
}
