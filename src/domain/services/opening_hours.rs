use crate::domain::models::{
    clock,
    establishment::{OpeningDay, OpeningSlot},
    weekday::Weekday,
};
use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLACEHOLDER_OPEN: &str = "17:00";
pub const PLACEHOLDER_CLOSE: &str = "23:30";
pub const REST_DAY: Weekday = Weekday::Sunday;

/// One day as edited in the dashboard form: a single slot plus a closed flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDay {
    pub closed: Option<bool>,
    pub open: Option<String>,
    pub close: Option<String>,
}

/// Sparse per-day overrides; days left out fall back to the placeholders.
pub type OpeningHoursForm = BTreeMap<Weekday, FormDay>;

/// Expands a sparse form into the canonical seven-day table, Monday first.
pub fn normalize(form: &OpeningHoursForm) -> Result<Vec<OpeningDay>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut table = Vec::with_capacity(Weekday::ALL.len());

    for day in Weekday::ALL {
        let entry = form.get(&day).cloned().unwrap_or_default();
        let closed = entry.closed.unwrap_or(day == REST_DAY);

        let open = entry.open.as_deref().unwrap_or(PLACEHOLDER_OPEN);
        let close = entry.close.as_deref().unwrap_or(PLACEHOLDER_CLOSE);
        let open = clock::parse_clock_time(open);
        let close = clock::parse_clock_time(close);
        if open.is_none() {
            errors.add(format!("{}.open", day), "Use the HH:MM format");
        }
        if close.is_none() {
            errors.add(format!("{}.close", day), "Use the HH:MM format");
        }

        let slots = match (closed, open, close) {
            (false, Some(open), Some(close)) => vec![OpeningSlot { open, close }],
            _ => Vec::new(),
        };
        table.push(OpeningDay { day, slots });
    }

    errors.into_result(table)
}

/// Folds a table back into form entries, one per day present. Only the first
/// slot of a day survives.
pub fn denormalize(days: &[OpeningDay]) -> OpeningHoursForm {
    let mut form = OpeningHoursForm::new();

    for opening_day in days {
        if form.contains_key(&opening_day.day) {
            continue;
        }
        let slot = opening_day.slots.first();
        form.insert(opening_day.day, FormDay {
            closed: Some(slot.is_none()),
            open: Some(slot.map_or_else(|| PLACEHOLDER_OPEN.to_string(), |s| clock::format_clock_time(&s.open))),
            close: Some(slot.map_or_else(|| PLACEHOLDER_CLOSE.to_string(), |s| clock::format_clock_time(&s.close))),
        });
    }

    form
}

/// Brings any table (sparse, unordered, multi-slot) into canonical shape.
pub fn canonicalize(days: &[OpeningDay]) -> Vec<OpeningDay> {
    // Times in a table are already parsed, so normalizing its form cannot fail.
    normalize(&denormalize(days)).unwrap_or_else(|_| default_table())
}

pub fn default_table() -> Vec<OpeningDay> {
    Weekday::ALL
        .into_iter()
        .map(|day| OpeningDay {
            day,
            slots: match (day == REST_DAY, clock::parse_clock_time(PLACEHOLDER_OPEN), clock::parse_clock_time(PLACEHOLDER_CLOSE)) {
                (false, Some(open), Some(close)) => vec![OpeningSlot { open, close }],
                _ => Vec::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn slot(open: (u32, u32), close: (u32, u32)) -> OpeningSlot {
        OpeningSlot {
            open: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            close: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
        }
    }

    fn comptoir_table() -> Vec<OpeningDay> {
        vec![
            OpeningDay { day: Weekday::Monday, slots: vec![slot((17, 0), (23, 30))] },
            OpeningDay { day: Weekday::Tuesday, slots: vec![slot((17, 0), (23, 30))] },
            OpeningDay { day: Weekday::Wednesday, slots: vec![slot((12, 0), (14, 30))] },
            OpeningDay { day: Weekday::Thursday, slots: vec![slot((17, 0), (1, 0))] },
            OpeningDay { day: Weekday::Friday, slots: vec![] },
            OpeningDay { day: Weekday::Saturday, slots: vec![slot((15, 0), (2, 0))] },
            OpeningDay { day: Weekday::Sunday, slots: vec![] },
        ]
    }

    #[test]
    fn test_empty_form_covers_every_day() {
        let table = normalize(&OpeningHoursForm::new()).unwrap();

        assert_eq!(table.len(), 7);
        assert_eq!(table.iter().map(|d| d.day).collect::<Vec<_>>(), Weekday::ALL.to_vec());
        for day in &table[..6] {
            assert_eq!(day.slots, vec![slot((17, 0), (23, 30))]);
        }
        assert!(table[6].slots.is_empty(), "sunday is the rest day");
        assert_eq!(table, default_table());
    }

    #[test]
    fn test_sparse_overrides() {
        let mut form = OpeningHoursForm::new();
        form.insert(Weekday::Sunday, FormDay { closed: Some(false), open: Some("11:00".into()), close: None });
        form.insert(Weekday::Monday, FormDay { closed: Some(true), ..Default::default() });

        let table = normalize(&form).unwrap();
        assert!(table[0].slots.is_empty());
        assert_eq!(table[6].slots, vec![slot((11, 0), (23, 30))]);
    }

    #[test]
    fn test_bad_times_reported_per_day() {
        let mut form = OpeningHoursForm::new();
        form.insert(Weekday::Tuesday, FormDay { closed: Some(false), open: Some("8h".into()), close: Some("25:00".into()) });

        let errors = normalize(&form).unwrap_err();
        assert!(errors.contains("tuesday.open"));
        assert!(errors.contains("tuesday.close"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_round_trip_single_slot_table() {
        let table = comptoir_table();
        assert_eq!(normalize(&denormalize(&table)).unwrap(), table);
    }

    #[test]
    fn test_round_trip_every_closed_day_mix() {
        let edge_slots = [
            slot((0, 0), (23, 59)),
            slot((23, 59), (0, 0)),
            slot((22, 0), (2, 0)),
            slot((17, 0), (23, 30)),
        ];

        for mask in 0u32..(1 << 7) {
            for offset in 0..edge_slots.len() {
                let table: Vec<OpeningDay> = Weekday::ALL
                    .into_iter()
                    .enumerate()
                    .map(|(i, day)| OpeningDay {
                        day,
                        slots: if mask & (1 << i) == 0 {
                            Vec::new()
                        } else {
                            vec![edge_slots[(i + offset) % edge_slots.len()]]
                        },
                    })
                    .collect();
                assert_eq!(normalize(&denormalize(&table)).unwrap(), table, "mask {:07b}", mask);
            }
        }
    }

    fn arb_time() -> impl Strategy<Value = NaiveTime> {
        prop_oneof![
            Just(NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
            Just(NaiveTime::from_hms_opt(23, 59, 0).unwrap()),
            (0u32..24, 0u32..60).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
        ]
    }

    fn arb_table() -> impl Strategy<Value = Vec<OpeningDay>> {
        proptest::collection::vec(proptest::option::of((arb_time(), arb_time())), 7).prop_map(|days| {
            Weekday::ALL
                .into_iter()
                .zip(days)
                .map(|(day, slot)| OpeningDay {
                    day,
                    slots: slot.map(|(open, close)| OpeningSlot { open, close }).into_iter().collect(),
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_single_slot_tables_round_trip(table in arb_table()) {
            prop_assert_eq!(normalize(&denormalize(&table)).unwrap(), table);
        }
    }

    #[test]
    fn test_multi_slot_day_collapses_to_first_slot() {
        let mut table = comptoir_table();
        table[4].slots = vec![slot((12, 0), (14, 30)), slot((17, 0), (2, 0))];

        let round_tripped = normalize(&denormalize(&table)).unwrap();
        assert_eq!(round_tripped[4].slots, vec![slot((12, 0), (14, 30))]);
    }

    #[test]
    fn test_canonicalize_sorts_and_fills() {
        let table = vec![
            OpeningDay { day: Weekday::Saturday, slots: vec![slot((15, 0), (2, 0))] },
            OpeningDay { day: Weekday::Monday, slots: vec![] },
        ];

        let canonical = canonicalize(&table);
        assert_eq!(canonical.len(), 7);
        assert_eq!(canonical[0], OpeningDay { day: Weekday::Monday, slots: vec![] });
        assert_eq!(canonical[5].slots, vec![slot((15, 0), (2, 0))]);
        assert_eq!(canonical[1].slots, vec![slot((17, 0), (23, 30))]);
    }
}
