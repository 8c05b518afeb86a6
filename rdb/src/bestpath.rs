// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::db::Rib;
use crate::types::{Address, Route};
use itertools::Itertools;

/// The bestpath algorithm chooses the single route, and the neighbor it was
/// learned from, used to forward traffic to `destination`. Candidates are
/// filtered in the following ordered sequence of operations.
///
/// - keep routes whose prefix contains the destination
/// - filter to the routes with the longest matching prefix
/// - filter to the routes with the largest local preference
/// - filter to self originated routes, if there are any
/// - filter to the routes with the shortest AS path
/// - filter to the routes with the best origin (IGP, then EGP, then UNK)
/// - choose the route learned from the numerically lowest neighbor address
///
/// Each step only separates candidates the previous steps left tied. If a
/// tie survives every step, the route that sorts first wins.
pub fn bestpath(destination: Address, rib: &Rib) -> Option<(&Route, Address)> {
    let candidates: Vec<(u8, &Route, Address)> = rib
        .iter()
        .filter_map(|(route, nexthop)| {
            route
                .matches(destination)
                .map(|length| (length, route, *nexthop))
        })
        .collect();

    // Short-circuit: no candidates, or only one, needs no tie breaking
    if candidates.len() <= 1 {
        return candidates
            .into_iter()
            .next()
            .map(|(_, route, nexthop)| (route, nexthop));
    }

    let candidates = candidates
        .into_iter()
        .max_set_by_key(|(length, _, _)| *length);

    let candidates = candidates
        .into_iter()
        .max_set_by_key(|(_, route, _)| route.local_pref);

    let candidates = candidates
        .into_iter()
        .max_set_by_key(|(_, route, _)| route.self_originated);

    let candidates = candidates
        .into_iter()
        .min_set_by_key(|(_, route, _)| route.as_path.len());

    let candidates = candidates
        .into_iter()
        .max_set_by_key(|(_, route, _)| route.origin);

    candidates
        .into_iter()
        .min_by_key(|(_, _, nexthop)| *nexthop)
        .map(|(_, route, nexthop)| (route, nexthop))
}

#[cfg(test)]
mod test {
    use super::bestpath;
    use crate::db::Rib;
    use crate::types::{Address, Mask, Origin, Route};
    use pretty_assertions::assert_eq;

    fn route(network: &str, length: u8) -> Route {
        Route {
            network: network.parse().unwrap(),
            netmask: Mask::from_length(length),
            as_path: vec![1, 2],
            local_pref: 100,
            self_originated: false,
            origin: Origin::Remote,
        }
    }

    const NH1: Address = Address::new(10, 0, 0, 2);
    const NH2: Address = Address::new(172, 16, 0, 2);
    const NH3: Address = Address::new(192, 168, 0, 2);

    #[test]
    fn test_bestpath_empty_and_unmatched() {
        let mut rib = Rib::new();
        let dst: Address = "192.168.0.25".parse().unwrap();
        assert!(bestpath(dst, &rib).is_none());

        rib.insert(route("192.168.12.0", 24), NH1);
        assert!(bestpath(dst, &rib).is_none());
    }

    #[test]
    fn test_bestpath_longest_prefix() {
        let mut rib = Rib::new();
        let dst: Address = "192.168.0.25".parse().unwrap();
        let wide = route("192.168.0.0", 16);
        let narrow = route("192.168.0.0", 24);
        let mut preferred_wide = wide.clone();
        preferred_wide.local_pref = 500;

        rib.insert(route("0.0.0.0", 0), NH1);
        assert_eq!(bestpath(dst, &rib).unwrap().1, NH1);

        rib.insert(preferred_wide, NH2);
        assert_eq!(bestpath(dst, &rib).unwrap().1, NH2);

        // prefix length beats every attribute
        rib.insert(narrow.clone(), NH3);
        assert_eq!(bestpath(dst, &rib), Some((&narrow, NH3)));
    }

    #[test]
    fn test_bestpath_tie_breaks() {
        let dst: Address = "10.1.2.3".parse().unwrap();
        let base = route("10.0.0.0", 8);

        // local preference
        let mut rib = Rib::new();
        let mut better = base.clone();
        better.local_pref = 150;
        rib.insert(base.clone(), NH1);
        rib.insert(better.clone(), NH2);
        assert_eq!(bestpath(dst, &rib), Some((&better, NH2)));

        // self origin
        let mut rib = Rib::new();
        let mut better = base.clone();
        better.self_originated = true;
        rib.insert(base.clone(), NH1);
        rib.insert(better.clone(), NH2);
        assert_eq!(bestpath(dst, &rib), Some((&better, NH2)));

        // as path length
        let mut rib = Rib::new();
        let mut better = base.clone();
        better.as_path = vec![9];
        rib.insert(base.clone(), NH1);
        rib.insert(better.clone(), NH2);
        assert_eq!(bestpath(dst, &rib), Some((&better, NH2)));

        // lowest neighbor address
        let mut rib = Rib::new();
        let mut other = base.clone();
        other.as_path = vec![7, 8];
        rib.insert(base.clone(), NH2);
        rib.insert(other.clone(), NH1);
        assert_eq!(bestpath(dst, &rib), Some((&other, NH1)));
    }

    #[test]
    fn test_bestpath_origin_independent_of_insertion_order() {
        let dst: Address = "10.1.2.3".parse().unwrap();
        let remote = route("10.0.0.0", 8);
        let mut local = remote.clone();
        local.origin = Origin::Local;
        local.as_path = vec![3, 4];

        let mut rib = Rib::new();
        rib.insert(remote.clone(), NH1);
        rib.insert(local.clone(), NH2);
        assert_eq!(bestpath(dst, &rib), Some((&local, NH2)));

        let mut rib = Rib::new();
        rib.insert(local.clone(), NH2);
        rib.insert(remote.clone(), NH1);
        assert_eq!(bestpath(dst, &rib), Some((&local, NH2)));
    }
}
