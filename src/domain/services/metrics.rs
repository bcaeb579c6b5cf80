use crate::domain::models::{offer::Offer, stats::{StatsOverview, VisitorCounters}};

/// Dashboard figures: the externally fed counters plus the number of offers
/// currently switched on.
pub fn summarize(counters: VisitorCounters, offers: &[Offer]) -> StatsOverview {
    let active_offers = offers.iter().filter(|offer| offer.is_active).count() as i64;

    StatsOverview {
        total_visitors: counters.total_visitors,
        offers_viewed: counters.offers_viewed,
        offers_redeemed: counters.offers_redeemed,
        active_offers,
        visitors_trend: counters.visitors_trend,
    }
}
