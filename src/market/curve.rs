//! Aggregate demand/supply curve construction.

use rust_decimal::Decimal;

use super::types::{Bid, CurvePoint, Offer};

/// Merge the cumulative demand and supply step functions into a single
/// ordered breakpoint sequence.
///
/// Bids are sorted by price descending, offers by price ascending; both use
/// a stable sort, so the caller's submission order breaks price ties
/// (earliest first). At each quantity level drawn from the union of both
/// sides' cumulative breakpoints, the point records the currently active bid
/// price/buyer and offer price/seller, `None` once that side is exhausted.
///
/// Pure function: the output quantity is strictly increasing and the same
/// frozen book always yields a bit-identical sequence. Entries must have
/// positive quantity (the order book enforces this at submission).
pub fn build_curve(bids: &[Bid], offers: &[Offer]) -> Vec<CurvePoint> {
    let mut bids: Vec<&Bid> = bids.iter().collect();
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    let mut offers: Vec<&Offer> = offers.iter().collect();
    offers.sort_by(|a, b| a.price.cmp(&b.price));

    // Cumulative step functions for each side.
    let mut demand = Vec::with_capacity(bids.len());
    let mut acc = Decimal::ZERO;
    for bid in bids {
        acc += bid.quantity;
        demand.push((acc, bid));
    }

    let mut supply = Vec::with_capacity(offers.len());
    let mut acc = Decimal::ZERO;
    for offer in offers {
        acc += offer.quantity;
        supply.push((acc, offer));
    }

    // Union of the two sides' quantity breakpoints.
    let mut levels: Vec<Decimal> = demand
        .iter()
        .map(|(cumulative, _)| *cumulative)
        .chain(supply.iter().map(|(cumulative, _)| *cumulative))
        .collect();
    levels.sort();
    levels.dedup();

    levels
        .into_iter()
        .map(|level| {
            // Demand side: the best still-unmatched bid. A bid exhausted
            // exactly at this level no longer backs it, so the point carries
            // the next bid down the curve; the final demand breakpoint keeps
            // the last bid so a fully executed market is priced at the
            // lowest winning bid.
            let bid = demand
                .iter()
                .find(|(cumulative, _)| *cumulative > level)
                .or_else(|| demand.last().filter(|(cumulative, _)| *cumulative == level))
                .map(|(_, bid)| *bid);
            // Supply side: the offer whose cumulative segment covers this
            // level, through its exhaustion point.
            let offer = supply
                .iter()
                .find(|(cumulative, _)| *cumulative >= level)
                .map(|(_, offer)| *offer);

            CurvePoint {
                cumulative_quantity: level,
                bid_price: bid.map(|b| b.price),
                offer_price: offer.map(|o| o.price),
                buyer: bid.map(|b| b.participant),
                seller: offer.map(|o| o.participant),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn bid(price: i64, quantity: i64, participant: Uuid) -> Bid {
        Bid {
            price: Decimal::from(price),
            quantity: Decimal::from(quantity),
            participant,
        }
    }

    fn offer(price: i64, quantity: i64, participant: Uuid) -> Offer {
        Offer {
            price: Decimal::from(price),
            quantity: Decimal::from(quantity),
            participant,
        }
    }

    #[test]
    fn test_merges_breakpoints_from_both_sides() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let s1 = Uuid::new_v4();
        let s2 = Uuid::new_v4();

        let bids = vec![bid(10, 5, b1), bid(8, 3, b2)];
        let offers = vec![offer(6, 4, s1), offer(9, 4, s2)];

        let curve = build_curve(&bids, &offers);

        // Demand breaks at 5 and 8, supply at 4 and 8: union {4, 5, 8}.
        assert_eq!(curve.len(), 3);

        assert_eq!(curve[0].cumulative_quantity, Decimal::from(4));
        assert_eq!(curve[0].bid_price, Some(Decimal::from(10)));
        assert_eq!(curve[0].offer_price, Some(Decimal::from(6)));
        assert_eq!(curve[0].buyer, Some(b1));
        assert_eq!(curve[0].seller, Some(s1));

        // B1 is exhausted exactly at 5, so the point carries B2's bid.
        assert_eq!(curve[1].cumulative_quantity, Decimal::from(5));
        assert_eq!(curve[1].bid_price, Some(Decimal::from(8)));
        assert_eq!(curve[1].buyer, Some(b2));
        assert_eq!(curve[1].offer_price, Some(Decimal::from(9)));
        assert_eq!(curve[1].seller, Some(s2));

        assert_eq!(curve[2].cumulative_quantity, Decimal::from(8));
        assert_eq!(curve[2].bid_price, Some(Decimal::from(8)));
        assert_eq!(curve[2].buyer, Some(b2));
        assert_eq!(curve[2].offer_price, Some(Decimal::from(9)));
    }

    #[test]
    fn test_sorts_bids_descending_offers_ascending() {
        let cheap_buyer = Uuid::new_v4();
        let eager_buyer = Uuid::new_v4();
        let cheap_seller = Uuid::new_v4();
        let dear_seller = Uuid::new_v4();

        // Submitted out of price order on purpose.
        let bids = vec![bid(5, 2, cheap_buyer), bid(12, 2, eager_buyer)];
        let offers = vec![offer(9, 3, dear_seller), offer(2, 1, cheap_seller)];

        let curve = build_curve(&bids, &offers);

        // Union {1, 2, 4}: the 1 kWh point sits inside the best bid's and
        // cheapest offer's segments, the 2 kWh point past both.
        assert_eq!(curve[0].buyer, Some(eager_buyer));
        assert_eq!(curve[0].seller, Some(cheap_seller));
        assert_eq!(curve[1].buyer, Some(cheap_buyer));
        assert_eq!(curve[1].seller, Some(dear_seller));
    }

    #[test]
    fn test_price_ties_break_by_submission_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let seller = Uuid::new_v4();
        let bids = vec![bid(7, 2, first), bid(7, 2, second)];
        // Offer breaks at 1 and 3 kWh expose each bid mid-segment.
        let offers = vec![offer(1, 1, seller), offer(1, 2, seller)];
        let curve = build_curve(&bids, &offers);

        assert_eq!(curve[0].cumulative_quantity, Decimal::from(1));
        assert_eq!(curve[0].buyer, Some(first));
        assert_eq!(curve[2].cumulative_quantity, Decimal::from(3));
        assert_eq!(curve[2].buyer, Some(second));
    }

    #[test]
    fn test_bid_exhausted_at_breakpoint_yields_to_next() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let seller = Uuid::new_v4();

        let bids = vec![bid(10, 5, b1), bid(8, 3, b2)];
        let offers = vec![offer(6, 5, seller)];

        let curve = build_curve(&bids, &offers);

        // At 5 kWh the first bid is fully absorbed; the next bid backs the
        // point. The final demand breakpoint keeps the last bid.
        assert_eq!(curve[0].cumulative_quantity, Decimal::from(5));
        assert_eq!(curve[0].bid_price, Some(Decimal::from(8)));
        assert_eq!(curve[0].buyer, Some(b2));
        assert_eq!(curve[1].cumulative_quantity, Decimal::from(8));
        assert_eq!(curve[1].bid_price, Some(Decimal::from(8)));
        assert_eq!(curve[1].buyer, Some(b2));
    }

    #[test]
    fn test_exhausted_side_is_absent() {
        let buyer = Uuid::new_v4();
        let seller = Uuid::new_v4();

        let bids = vec![bid(10, 3, buyer)];
        let offers = vec![offer(6, 7, seller)];

        let curve = build_curve(&bids, &offers);

        assert_eq!(curve.len(), 2);
        // Demand exhausts at 3; the 7 kWh breakpoint has no active bid.
        assert_eq!(curve[1].cumulative_quantity, Decimal::from(7));
        assert_eq!(curve[1].bid_price, None);
        assert_eq!(curve[1].buyer, None);
        assert_eq!(curve[1].offer_price, Some(Decimal::from(6)));
    }

    #[test]
    fn test_empty_side_yields_one_sided_curve() {
        let seller = Uuid::new_v4();
        let curve = build_curve(&[], &[offer(6, 4, seller)]);

        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].bid_price, None);
        assert_eq!(curve[0].offer_price, Some(Decimal::from(6)));

        assert!(build_curve(&[], &[]).is_empty());
    }

    #[test]
    fn test_quantity_strictly_increasing() {
        let participant = Uuid::new_v4();
        let bids = vec![bid(10, 4, participant), bid(9, 4, participant)];
        let offers = vec![offer(1, 8, participant)];

        let curve = build_curve(&bids, &offers);
        for pair in curve.windows(2) {
            assert!(pair[0].cumulative_quantity < pair[1].cumulative_quantity);
        }
    }
}
