//! Deterministic "quote of the day" selection
//!
//! The pick depends only on the date, the quote set, the seen set, and the
//! read status of each quote's book. No state survives between calls; a
//! caller that wants to pin today's pick must store it.
//!
//! Draws are made with a ChaCha8 generator seeded from the UTC date. Every
//! quote id gets a slot with a small try counter so repeat draws are detected
//! without a presence set. Selection gives up and recycles an unfiltered
//! random quote when every slot has been tried or when collisions reach twice
//! the quote count.

use crate::model::{Quote, ReadStatus};
use crate::SelectionError;
use chrono::{Datelike, NaiveDate, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

/// A slot redrawn this many times means the generator is stuck
const MAX_SLOT_TRIES: u8 = 100;

/// Result of a daily selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPick {
    pub quote_id: String,
    /// True when filtering could not find an eligible quote
    pub recycled: bool,
    pub seed: u64,
}

#[derive(Debug)]
struct Slot<'a> {
    quote_id: &'a str,
    tries: u8,
}

/// Seed for a date: year plus day of year
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use libble::daily::daily_seed;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(daily_seed(date), 2039);
/// ```
pub fn daily_seed(date: NaiveDate) -> u64 {
    (date.year() as i64 + date.ordinal() as i64).unsigned_abs()
}

/// Picks today's quote, using the current UTC date
pub fn pick_daily_quote<S>(
    quotes: &BTreeMap<String, Quote>,
    seen: &BTreeSet<String>,
    shelf: &S,
) -> Result<DailyPick, SelectionError>
where
    S: ReadStatus + ?Sized,
{
    pick_daily_quote_on(quotes, seen, shelf, Utc::now().date_naive())
}

/// Picks the quote for `date`
///
/// A quote is eligible when it is not in `seen` and its book is known to
/// `shelf` and marked read.
///
/// # Returns
///
/// * `Ok(DailyPick)` - An eligible quote, or a recycled one with `recycled` set
/// * `Err(SelectionError::NoQuotes)` - `quotes` is empty
/// * `Err(SelectionError::RetryLimitExceeded)` - A slot was redrawn too often
pub fn pick_daily_quote_on<S>(
    quotes: &BTreeMap<String, Quote>,
    seen: &BTreeSet<String>,
    shelf: &S,
    date: NaiveDate,
) -> Result<DailyPick, SelectionError>
where
    S: ReadStatus + ?Sized,
{
    let quote_count = quotes.len();
    if quote_count == 0 {
        return Err(SelectionError::NoQuotes);
    }

    let seed = daily_seed(date);
    tracing::debug!("Daily quote seed for {}: {}", date, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut slots: Vec<Slot<'_>> = quotes
        .keys()
        .map(|quote_id| Slot {
            quote_id: quote_id.as_str(),
            tries: 0,
        })
        .collect();

    let mut tried = 0;
    let mut collisions = 0;

    while tried < quote_count && collisions < quote_count * 2 {
        let slot = &mut slots[rng.gen_range(0..quote_count)];

        if slot.tries > 0 {
            collisions += 1;
            if slot.tries >= MAX_SLOT_TRIES {
                return Err(SelectionError::RetryLimitExceeded {
                    quote_id: slot.quote_id.to_string(),
                });
            }
            slot.tries += 1;
            continue;
        }

        slot.tries = 1;
        tried += 1;

        let quote_id = slot.quote_id;
        if seen.contains(quote_id) {
            continue;
        }

        let Some(quote) = quotes.get(quote_id) else {
            continue;
        };
        match shelf.is_book_read(&quote.book_id) {
            Some(true) => {
                return Ok(DailyPick {
                    quote_id: quote_id.to_string(),
                    recycled: false,
                    seed,
                })
            }
            Some(false) => continue,
            None => {
                tracing::debug!(
                    "Couldn't find book {} for quote {}",
                    quote.book_id,
                    quote_id
                );
                continue;
            }
        }
    }

    tracing::warn!(
        "Recycling quote: no eligible quote after {} tries and {} collisions",
        tried,
        collisions
    );
    let slot = &slots[rng.gen_range(0..quote_count)];
    Ok(DailyPick {
        quote_id: slot.quote_id.to_string(),
        recycled: true,
        seed,
    })
}
