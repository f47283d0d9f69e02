use super::formatters::{format_change_percent, format_compact, format_usd, truncate_str};
use crate::analysis::{market_sentiment, score_explanation, score_token};
use crate::api::TokenInfo;
use crate::users::UserRecord;

const MAX_CELL_WIDTH: usize = 32;

pub fn render_user_table(users: &[UserRecord]) -> String {
    let header = ["ID", "Username", "Email"];
    let rows: Vec<[String; 3]> = users
        .iter()
        .map(|u| {
            [
                u.id.to_string(),
                truncate_str(&u.username, MAX_CELL_WIDTH),
                truncate_str(&u.email, MAX_CELL_WIDTH),
            ]
        })
        .collect();

    // Column width = widest cell, header included
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 3]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(header)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        out.push(line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
    }
    if rows.is_empty() {
        out.push("(no users)".to_string());
    }
    out.join("\n")
}

pub fn render_token_info(info: &TokenInfo) -> String {
    let score = score_token(info);
    [
        format!("{} ({})", info.name, info.symbol),
        format!("Address:    {}", info.address),
        format!("Price:      {}", format_usd(info.price)),
        format!(
            "24h change: {} ({})",
            format_change_percent(info.price_change_24h),
            market_sentiment(info.price_change_24h)
        ),
        format!("Liquidity:  ${}", format_compact(info.liquidity_usd)),
        format!("24h volume: ${}", format_compact(info.volume_24h)),
        format!("Buys/Sells: {}/{}", info.buys_24h, info.sells_24h),
        format!("DEX:        {} on {}", info.dex, info.chain),
        format!("Score:      {}/100 ({})", score, score_explanation(score)),
    ]
    .join("\n")
}
