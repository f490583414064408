use rand::Rng;
use rand::seq::SliceRandom;
use ratatui::style::Color;
use ratatui::widgets::BorderType;
use std::time::{Duration, Instant};

/// How often the frame clock wakes up to check for due cards.
pub const FRAME_TICK: Duration = Duration::from_millis(250);

const BASE_PERIOD_MS: u64 = 3000;
const JITTER_MS: u64 = 2000;
const STAGGER_MS: u64 = 100;

/// Cosmetic border style of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    Classic,
    Rounded,
    Double,
    Thick,
    Neon,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 5] = [
        Self::Classic,
        Self::Rounded,
        Self::Double,
        Self::Thick,
        Self::Neon,
    ];

    pub fn border_type(self) -> BorderType {
        match self {
            Self::Classic => BorderType::Plain,
            Self::Rounded => BorderType::Rounded,
            Self::Double => BorderType::Double,
            Self::Thick => BorderType::Thick,
            Self::Neon => BorderType::QuadrantOutside,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Classic => Color::Gray,
            Self::Rounded => Color::Cyan,
            Self::Double => Color::Yellow,
            Self::Thick => Color::Magenta,
            Self::Neon => Color::LightGreen,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::Classic)
    }

    /// A random style guaranteed to differ from `self`.
    pub fn random_other<R: Rng>(self, rng: &mut R) -> Self {
        let others: Vec<FrameStyle> = Self::ALL.into_iter().filter(|s| *s != self).collect();
        *others.choose(rng).unwrap_or(&self)
    }
}

#[derive(Debug, Clone)]
struct CardFrame {
    style: FrameStyle,
    period: Duration,
    due: Instant,
}

/// Frame styles for every card of the displayed grid.
///
/// Rebuilt with each grid; a single clock drives all cards through [`tick`].
///
/// [`tick`]: FrameRotator::tick
#[derive(Debug, Clone, Default)]
pub struct FrameRotator {
    cards: Vec<CardFrame>,
}

impl FrameRotator {
    pub fn new<R: Rng>(count: usize, now: Instant, rng: &mut R) -> Self {
        let cards = (0..count)
            .map(|idx| {
                let period = Duration::from_millis(
                    BASE_PERIOD_MS + rng.gen_range(0..JITTER_MS) + idx as u64 * STAGGER_MS,
                );
                CardFrame {
                    style: FrameStyle::random(rng),
                    period,
                    due: now + period,
                }
            })
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn style(&self, idx: usize) -> FrameStyle {
        self.cards
            .get(idx)
            .map(|c| c.style)
            .unwrap_or(FrameStyle::Classic)
    }

    /// Switch every due card to a different style. Returns how many changed.
    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) -> usize {
        let mut changed = 0;
        for card in self.cards.iter_mut().filter(|c| c.due <= now) {
            card.style = card.style.random_other(rng);
            card.due = now + card.period;
            changed += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_other_never_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        for style in FrameStyle::ALL {
            for _ in 0..50 {
                assert_ne!(style.random_other(&mut rng), style);
            }
        }
    }

    #[test]
    fn test_periods_are_staggered_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Instant::now();
        let rotator = FrameRotator::new(10, now, &mut rng);
        assert_eq!(rotator.len(), 10);
        for (idx, card) in rotator.cards.iter().enumerate() {
            let min = Duration::from_millis(BASE_PERIOD_MS + idx as u64 * STAGGER_MS);
            assert!(card.period >= min);
            assert!(card.period < min + Duration::from_millis(JITTER_MS));
            assert_eq!(card.due, now + card.period);
        }
    }

    #[test]
    fn test_tick_changes_only_due_cards() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Instant::now();
        let mut rotator = FrameRotator::new(4, now, &mut rng);
        let before: Vec<FrameStyle> = (0..4).map(|i| rotator.style(i)).collect();

        assert_eq!(rotator.tick(now + Duration::from_millis(100), &mut rng), 0);

        let later = now + Duration::from_millis(10_000);
        assert_eq!(rotator.tick(later, &mut rng), 4);
        for (i, old) in before.iter().enumerate() {
            assert_ne!(rotator.style(i), *old);
        }

        // Each card is rescheduled a full period after the tick.
        assert_eq!(rotator.tick(later, &mut rng), 0);
    }

    #[test]
    fn test_out_of_range_style() {
        assert_eq!(FrameRotator::default().style(3), FrameStyle::Classic);
    }
}
