//! # Chance Cards
//!
//! Cards drawn when a hero picks up a mystery card. Each card carries a
//! typed effect; the description is flavor text for the presentation layer.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Magnitude used when a description names no number.
pub const DEFAULT_CARD_MAGNITUDE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Fortune,
    Misfortune,
}

/// What a card does when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    GainLife(u32),
    LoseLife(u32),
    /// Adds one treasure to the drawer's inventory
    GainTrophy,
    /// Ends the drawer's turn immediately
    LoseTurn,
    /// Moves the drawer to a random free, dry cell
    Teleport,
}

impl CardEffect {
    /// Derives an effect from free-form card text.
    ///
    /// Rules are checked in order: gain/heal with life, lose with life,
    /// trophy, lose with turn, teleport. Life amounts use the first number
    /// in the text, or [`DEFAULT_CARD_MAGNITUDE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::CardEffect;
    ///
    /// assert_eq!(CardEffect::infer("Gain 30 life!"), Some(CardEffect::GainLife(30)));
    /// assert_eq!(CardEffect::infer("Lose some life"), Some(CardEffect::LoseLife(20)));
    /// assert_eq!(CardEffect::infer("Nothing happens"), None);
    /// ```
    pub fn infer(description: &str) -> Option<CardEffect> {
        let text = description.to_lowercase();
        let has = |word: &str| text.contains(word);
        let magnitude = || first_number(&text).unwrap_or(DEFAULT_CARD_MAGNITUDE);

        if (has("gain") || has("heal")) && has("life") {
            Some(CardEffect::GainLife(magnitude()))
        } else if has("lose") && has("life") {
            Some(CardEffect::LoseLife(magnitude()))
        } else if has("trophy") {
            Some(CardEffect::GainTrophy)
        } else if has("lose") && has("turn") {
            Some(CardEffect::LoseTurn)
        } else if has("teleport") {
            Some(CardEffect::Teleport)
        } else {
            None
        }
    }

    pub fn magnitude(&self) -> u32 {
        match self {
            CardEffect::GainLife(amount) | CardEffect::LoseLife(amount) => *amount,
            CardEffect::GainTrophy => 1,
            CardEffect::LoseTurn | CardEffect::Teleport => 0,
        }
    }
}

fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// A single chance card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceCard {
    pub category: CardCategory,
    pub description: String,
    pub effect: CardEffect,
}

impl ChanceCard {
    pub fn new(category: CardCategory, description: impl Into<String>, effect: CardEffect) -> Self {
        Self {
            category,
            description: description.into(),
            effect,
        }
    }

    /// Builds a card whose effect is inferred from its description.
    pub fn from_description(
        category: CardCategory,
        description: impl Into<String>,
    ) -> Option<Self> {
        let description = description.into();
        let effect = CardEffect::infer(&description)?;
        Some(Self::new(category, description, effect))
    }
}

/// The built-in deck.
pub fn standard_deck() -> Vec<ChanceCard> {
    use CardCategory::*;
    use CardEffect::*;

    vec![
        ChanceCard::new(Fortune, "Gain 30 life!", GainLife(30)),
        ChanceCard::new(Fortune, "Gain 1 extra trophy!", GainTrophy),
        ChanceCard::new(Fortune, "Teleport to a random position!", Teleport),
        ChanceCard::new(Misfortune, "Lose 25 life!", LoseLife(25)),
        ChanceCard::new(Misfortune, "Lose a turn!", LoseTurn),
        ChanceCard::new(Fortune, "Gain 50 life!", GainLife(50)),
        ChanceCard::new(Misfortune, "Lose 15 life!", LoseLife(15)),
        ChanceCard::new(Fortune, "Magic teleport to a safe place!", Teleport),
    ]
}

/// Draws a card uniformly at random. Returns None for an empty deck.
pub fn draw_card<'a, R: Rng + ?Sized>(deck: &'a [ChanceCard], rng: &mut R) -> Option<&'a ChanceCard> {
    deck.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_standard_deck_matches_inference() {
        for card in standard_deck() {
            assert_eq!(
                CardEffect::infer(&card.description),
                Some(card.effect),
                "card text disagrees with effect: {}",
                card.description
            );
        }
    }

    #[test]
    fn test_infer_rule_order() {
        assert_eq!(CardEffect::infer("Heal 12 life"), Some(CardEffect::GainLife(12)));
        assert_eq!(CardEffect::infer("LOSE 7 LIFE"), Some(CardEffect::LoseLife(7)));
        assert_eq!(CardEffect::infer("Lose a turn"), Some(CardEffect::LoseTurn));
        assert_eq!(CardEffect::infer("A trophy appears"), Some(CardEffect::GainTrophy));
        assert_eq!(CardEffect::infer("teleport away"), Some(CardEffect::Teleport));
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("lose 25 life and 3 turns"), Some(25));
        assert_eq!(first_number("no digits"), None);
    }

    #[test]
    fn test_from_description() {
        let card = ChanceCard::from_description(CardCategory::Fortune, "Gain 5 life").unwrap();
        assert_eq!(card.effect, CardEffect::GainLife(5));
        assert!(ChanceCard::from_description(CardCategory::Fortune, "Shrug").is_none());
    }

    #[test]
    fn test_draw_card() {
        let deck = standard_deck();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let card = draw_card(&deck, &mut rng).unwrap();
            assert!(deck.contains(card));
        }
        assert!(draw_card(&[], &mut rng).is_none());
    }
}
