use crate::api::TokenInfo;

/// Neutral starting point before any market signal is applied.
const BASE_SCORE: i32 = 50;

/// Heuristic 0-100 score from the pair's liquidity, volume turnover, price
/// action, trade count and buy pressure. Higher is healthier.
pub fn score_token(token: &TokenInfo) -> u8 {
    let mut score = BASE_SCORE;

    score += match token.liquidity_usd {
        l if l > 1_000_000.0 => 20,
        l if l > 500_000.0 => 15,
        l if l > 100_000.0 => 10,
        l if l > 50_000.0 => 5,
        _ => 0,
    };

    let turnover = if token.liquidity_usd > 0.0 {
        token.volume_24h / token.liquidity_usd
    } else {
        0.0
    };
    score += match turnover {
        r if r > 1.0 => 15,
        r if r > 0.5 => 10,
        r if r > 0.1 => 5,
        _ => 0,
    };

    score += match token.price_change_24h {
        c if c > 100.0 => 15,
        c if c > 50.0 => 10,
        c if c > 20.0 => 5,
        c if c < -50.0 => -15,
        _ => 0,
    };

    score += match token.buys_24h.saturating_add(token.sells_24h) {
        t if t > 1000 => 10,
        t if t > 500 => 7,
        t if t > 100 => 5,
        _ => 0,
    };

    if token.buys_24h > 0 && token.sells_24h > 0 {
        let pressure = token.buys_24h as f64 / token.sells_24h as f64;
        score += match pressure {
            p if p > 2.0 => 10,
            p if p > 1.5 => 7,
            p if p > 1.0 => 5,
            _ => 0,
        };
    }

    score.clamp(0, 100) as u8
}

/// One-line reading of a [`score_token`] result.
pub fn score_explanation(score: u8) -> &'static str {
    match score {
        90.. => "Excellent - strong on every metric",
        80..=89 => "Very good - solid with growth potential",
        70..=79 => "Good - sound fundamentals, worth watching",
        60..=69 => "Average - keep observing",
        50..=59 => "Watch - needs time to prove itself",
        _ => "High risk - proceed with caution",
    }
}

/// Market mood from a 24h percentage change.
pub fn market_sentiment(change_24h: f64) -> &'static str {
    if change_24h > 10.0 {
        "Very bullish"
    } else if change_24h > 5.0 {
        "Bullish"
    } else if change_24h > -5.0 {
        "Stable"
    } else if change_24h > -10.0 {
        "Bearish"
    } else {
        "Very bearish"
    }
}
