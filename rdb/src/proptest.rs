// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for the prefix arithmetic and route aggregation
//! using proptest.

#[cfg(test)]
mod proptest {
    use crate::aggregate::aggregate_group;
    use crate::types::{Address, Mask, Origin, Route};
    use proptest::prelude::*;

    fn host_bits_unset(bits: u32, length: u8) -> u32 {
        bits & Mask::from_length(length).to_bits()
    }

    // Strategy for generating routes with aligned networks and a shared set
    // of attributes, so that aggregation has something to do.
    fn route_strategy() -> impl Strategy<Value = Route> {
        (any::<u32>(), 16u8..=32u8).prop_map(|(bits, length)| Route {
            network: Address::from_bits(host_bits_unset(bits, length)),
            netmask: Mask::from_length(length),
            as_path: vec![64500],
            local_pref: 100,
            self_originated: false,
            origin: Origin::Remote,
        })
    }

    proptest! {
        /// Property: a mask built from a length reports that length back
        #[test]
        fn prop_mask_length_round_trip(length in 0u8..=32u8) {
            let mask = Mask::from_length(length);
            prop_assert_eq!(mask.length(), length);
            prop_assert_eq!(mask.shift(), 32 - length);
            prop_assert_eq!(Mask::new(mask.into()), Ok(mask));
        }

        /// Property: every address within a route's prefix matches with the
        /// prefix length
        #[test]
        fn prop_route_matches_own_hosts(route in route_strategy(), host in any::<u32>()) {
            let host_mask = !route.netmask.to_bits();
            let dst = Address::from_bits(route.network.to_bits() | (host & host_mask));
            prop_assert_eq!(route.matches(dst), Some(route.netmask.length()));
        }

        /// Property: the default route matches everything
        #[test]
        fn prop_default_route_matches_all(dst in any::<u32>()) {
            let route = Route {
                network: Address::new(0, 0, 0, 0),
                netmask: Mask::from_length(0),
                as_path: vec![],
                local_pref: 100,
                self_originated: false,
                origin: Origin::Unknown,
            };
            prop_assert_eq!(route.matches(Address::from_bits(dst)), Some(0));
        }

        /// Property: aggregation never grows a group, and every network in
        /// the input is still covered by some aggregated route
        #[test]
        fn prop_aggregation_covers_input(
            group in proptest::collection::btree_set(route_strategy(), 0..24)
        ) {
            let input: Vec<Route> = group.into_iter().collect();
            let output = aggregate_group(input.clone());
            prop_assert!(output.len() <= input.len());
            for route in &input {
                prop_assert!(
                    output.iter().any(|a| {
                        a.netmask.length() <= route.netmask.length()
                            && a.matches(route.network).is_some()
                    }),
                    "{} is not covered by the aggregate", route
                );
            }
        }

        /// Property: aggregating an aggregate changes nothing
        #[test]
        fn prop_aggregation_is_a_fixpoint(
            group in proptest::collection::btree_set(route_strategy(), 0..24)
        ) {
            let once = aggregate_group(group.into_iter().collect());
            let twice = aggregate_group(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
