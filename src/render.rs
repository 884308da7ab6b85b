//! Renderers that draw a `DashboardView`

use crate::{
    notification::NotificationKind,
    view::{DashboardView, Trend},
};
use std::io::{self, Write};

/// Draws a complete frame from a view
///
/// Implementations keep no dashboard state between frames.
pub trait Renderer {
    fn render(&mut self, view: &DashboardView) -> io::Result<()>;
}

/// Plain-text renderer for terminals and logs
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "+",
        Trend::Down => "-",
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &DashboardView) -> io::Result<()> {
        let out = &mut self.out;

        for notification in &view.notifications {
            let tag = match notification.kind {
                NotificationKind::Success => "ok",
                NotificationKind::Info => "info",
                NotificationKind::Error => "error",
            };
            writeln!(out, "[{}] {}", tag, notification.message)?;
        }

        if let Some(stats) = &view.stats {
            writeln!(
                out,
                "Market cap: {}  |  24h volume: {}  |  {} dominance: {}",
                stats.total_market_cap, stats.total_volume, stats.dominant_symbol, stats.dominance
            )?;
        }

        let status = if view.loading { "Loading..." } else { "" };
        match &view.last_updated {
            Some(updated) => writeln!(out, "{} {}", updated, status)?,
            None => writeln!(out, "{}", status)?,
        }

        if view.selected_currency != view.currency {
            writeln!(
                out,
                "Prices in {} until {} figures arrive",
                view.currency.code().to_uppercase(),
                view.selected_currency.code().to_uppercase()
            )?;
        }

        if !view.search_term.trim().is_empty() {
            writeln!(out, "Search: {}", view.search_term)?;
        }

        writeln!(
            out,
            "{:>4}  {:<24} {:<8} {:>18} {:>10} {:>24}  {}",
            "#",
            "Name",
            "Symbol",
            format!("Price ({})", view.currency.code().to_uppercase()),
            "24h",
            "Market cap",
            "Watch"
        )?;
        for row in &view.rows {
            writeln!(
                out,
                "{:>4}  {:<24} {:<8} {:>18} {:>10} {:>24}  {}",
                row.rank,
                row.name,
                row.symbol,
                row.price,
                row.change,
                row.market_cap,
                if row.in_watchlist { "[-]" } else { "[+]" }
            )?;
        }
        writeln!(
            out,
            "{} Page {} of {} {}",
            if view.pagination.prev_enabled { "<" } else { " " },
            view.pagination.current_page,
            view.pagination.total_pages,
            if view.pagination.next_enabled { ">" } else { " " },
        )?;

        writeln!(out)?;
        let panel = &view.watchlist;
        if panel.is_empty {
            writeln!(out, "Watchlist is empty")?;
        } else {
            writeln!(
                out,
                "Watchlist: {} coins ({} up, {} down)",
                panel.count, panel.gainers, panel.losers
            )?;
            for row in &panel.rows {
                writeln!(
                    out,
                    "  {} {:<24} {:<8} {:>18} {:>10}{}",
                    trend_marker(row.trend),
                    row.name,
                    row.symbol,
                    row.price,
                    row.change,
                    if row.live { "" } else { "  (snapshot)" }
                )?;
            }
        }

        out.flush()
    }
}
