// SVG cards behind the frame image routes.

use crate::{
    constants::MOXIE_TICKER,
    models::FanToken,
    utils::escape_markup,
};

const BACKGROUND: &str = "#FFFFFF";
const FONT_COLOR: &str = "#6C7CE6";
const MODAL_COLOR: &str = "#EDEDED";
const FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";

const LINE_GAP: u32 = 24;
const HIGHLIGHT_PADDING: u32 = 18;
const AVATAR_SIZE: u32 = 200;
const HEADER_HEIGHT: u32 = 98;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSize {
    Square,
    Wide,
}

impl CardSize {
    fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (1024, 1024),
            Self::Wide => (1146, 600),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CardLine {
    Caption { text: String, size: u32 },
    Highlight { text: String, size: u32 },
}

impl CardLine {
    fn height(&self) -> u32 {
        match self {
            Self::Caption { size, .. } => *size,
            Self::Highlight { size, .. } => size + HIGHLIGHT_PADDING * 2,
        }
    }
}

/// A white card with the MOXIE header and centered lines of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    size: CardSize,
    avatar: Option<String>,
    lines: Vec<CardLine>,
}

impl Card {
    pub fn new(size: CardSize) -> Self {
        Self {
            size,
            avatar: None,
            lines: Vec::new(),
        }
    }

    pub fn caption(mut self, text: impl Into<String>) -> Self {
        self.lines.push(CardLine::Caption {
            text: text.into(),
            size: 32,
        });
        self
    }

    pub fn highlight(mut self, text: impl Into<String>, size: u32) -> Self {
        self.lines.push(CardLine::Highlight {
            text: text.into(),
            size,
        });
        self
    }

    /// Circular avatar above the text. Blank URLs are ignored.
    pub fn avatar(mut self, url: Option<String>) -> Self {
        self.avatar = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn render(&self) -> String {
        let (width, height) = self.size.dimensions();
        let center_x = width / 2;

        let mut content_height: u32 = self.lines.iter().map(CardLine::height).sum();
        content_height += LINE_GAP * (self.lines.len().saturating_sub(1) as u32);
        if self.avatar.is_some() {
            content_height += AVATAR_SIZE + LINE_GAP;
        }

        let available = height.saturating_sub(HEADER_HEIGHT);
        let mut y = HEADER_HEIGHT + available.saturating_sub(content_height) / 2;

        let mut body = Vec::new();
        if let Some(url) = &self.avatar {
            let x = center_x - AVATAR_SIZE / 2;
            let radius = AVATAR_SIZE / 2;
            body.push(format!(
                r#"<clipPath id="avatar"><circle cx="{cx}" cy="{cy}" r="{r}"/></clipPath><image href="{href}" x="{x}" y="{y}" width="{s}" height="{s}" clip-path="url(#avatar)" preserveAspectRatio="xMidYMid slice"/>"#,
                cx = center_x,
                cy = y + radius,
                r = radius,
                href = escape_markup(url),
                x = x,
                y = y,
                s = AVATAR_SIZE
            ));
            y += AVATAR_SIZE + LINE_GAP;
        }

        for line in &self.lines {
            match line {
                CardLine::Caption { text, size } => {
                    body.push(text_node(center_x, y + size * 4 / 5, *size, "400", text));
                }
                CardLine::Highlight { text, size } => {
                    let box_width = estimate_width(text, *size) + HIGHLIGHT_PADDING * 2;
                    body.push(format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                        center_x.saturating_sub(box_width / 2),
                        y,
                        box_width,
                        line.height(),
                        MODAL_COLOR
                    ));
                    body.push(text_node(
                        center_x,
                        y + HIGHLIGHT_PADDING + size * 4 / 5,
                        *size,
                        "700",
                        text,
                    ));
                }
            }
            y += line.height() + LINE_GAP;
        }

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="{bg}"/><text x="48" y="{hy}" font-family="{font}" font-size="44" font-weight="800" fill="{fg}">MOXIE</text>{body}</svg>"#,
            w = width,
            h = height,
            bg = BACKGROUND,
            hy = HEADER_HEIGHT,
            font = FONT_FAMILY,
            fg = FONT_COLOR,
            body = body.join("")
        )
    }
}

fn text_node(x: u32, baseline: u32, size: u32, weight: &str, text: &str) -> String {
    format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
        x,
        baseline,
        FONT_FAMILY,
        size,
        weight,
        FONT_COLOR,
        escape_markup(text)
    )
}

// Rough advance width; only used to size the highlight box.
fn estimate_width(text: &str, size: u32) -> u32 {
    text.chars().count() as u32 * size * 3 / 5
}

pub fn home_card() -> Card {
    Card::new(CardSize::Square)
        .highlight("Reward your Fans", 48)
        .caption("buy and burn moxie to reward fans")
}

pub fn token_card(token: &FanToken, avatar: Option<String>) -> Card {
    Card::new(CardSize::Square)
        .avatar(avatar)
        .caption(token.name.clone())
        .highlight(format!("{} fans", token.holder_count), 48)
}

pub fn amount_card(balance: &str, usd: &str) -> Card {
    Card::new(CardSize::Square)
        .caption("You have")
        .highlight(usd, 64)
        .highlight(format!("{} {}", balance, MOXIE_TICKER), 48)
        .caption("to reward")
}

pub fn burned_card(token: &FanToken, burned: &str) -> Card {
    Card::new(CardSize::Square)
        .caption("I just burned")
        .highlight(format!("{} {}", burned, MOXIE_TICKER), 48)
        .caption(format!("for reward {}", token.holder_count))
        .highlight(format!("{} fans", token.name), 48)
}

pub fn waiting_card() -> Card {
    Card::new(CardSize::Wide)
        .highlight("Waiting for confirmation", 48)
        .caption("press Refresh once the transaction lands")
}
