use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::mtg::error::FetchError;
use crate::mtg::models::{Card, CardResponse};
use crate::mtg::status::StatusKind;

const PLACEHOLDER: &str = " ";

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// When set, only cards whose name is in the list are shown. Useful
    /// after an OR-pattern query that matched more than wanted.
    pub allow_list: Option<BTreeSet<String>>,
    pub first_only: bool,
}

impl RenderOptions {
    pub fn select<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        let allowed = cards.iter().filter(|card| match &self.allow_list {
            Some(names) => card
                .name
                .as_ref()
                .map_or(false, |name| names.contains(name)),
            None => true,
        });
        if self.first_only {
            allowed.take(1).collect()
        } else {
            allowed.collect()
        }
    }
}

pub fn render_outcome<W: Write>(
    out: &mut W,
    outcome: &Result<CardResponse, FetchError>,
    options: &RenderOptions,
) -> io::Result<()> {
    match outcome {
        Ok(response) => render_cards(out, &response.cards, options),
        Err(FetchError::Status { code, kind }) => match kind.report(*code) {
            Some(line) => writeln!(out, "{}", line),
            None => Ok(()),
        },
        Err(err) => writeln!(out, "Request error: {}", err),
    }
}

/// An empty result is shown the same way as a 404.
pub fn render_cards<W: Write>(
    out: &mut W,
    cards: &[Card],
    options: &RenderOptions,
) -> io::Result<()> {
    let selected = options.select(cards);
    if selected.is_empty() {
        let line = StatusKind::NotFound.report(404).unwrap_or_default();
        return writeln!(out, "{}", line);
    }

    for (i, card) in selected.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_card(out, card)?;
    }
    Ok(())
}

pub fn write_card<W: Write>(out: &mut W, card: &Card) -> io::Result<()> {
    let text = |field: &Option<String>| field.as_deref().unwrap_or(PLACEHOLDER).to_string();

    writeln!(out, "Card name: {}", text(&card.name))?;
    writeln!(out, "Mana cost: {}", text(&card.mana_cost))?;
    writeln!(out, "Converted mana cost: {}", card.cmc.unwrap_or(0))?;
    writeln!(out, "Type: {}", text(&card.card_type))?;
    writeln!(out, "Rarity: {}", text(&card.rarity))?;
    writeln!(out, "Set code: {}", text(&card.set))?;
    writeln!(out, "Set name: {}", text(&card.set_name))?;
    writeln!(out, "Artist: {}", text(&card.artist))
}
