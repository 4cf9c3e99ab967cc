//! Properties of filter-then-sort listings

use proptest::prelude::*;
use rolodeck::query::{filter_and_sort, QueryConfig};
use rolodeck::{Contact, ContactId};

fn contacts_strategy() -> impl Strategy<Value = Vec<Contact>> {
    prop::collection::vec(
        (
            prop::option::of("[A-Za-z]{0,6}"),
            prop::option::of("[A-Za-z]{0,6}"),
            0i64..20,
        ),
        0..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (first, last, created_at))| {
                let mut contact = Contact::new(ContactId::from(format!("c{i}")), created_at);
                contact.first = first;
                contact.last = last;
                contact
            })
            .collect()
    })
}

fn sort_key(contact: &Contact) -> (String, i64) {
    (contact.last.clone().unwrap_or_default(), contact.created_at)
}

fn position(contacts: &[Contact], id: &ContactId) -> usize {
    contacts.iter().position(|c| &c.id == id).unwrap()
}

proptest! {
    #[test]
    fn absent_query_returns_every_contact_sorted(contacts in contacts_strategy()) {
        let listed = filter_and_sort(contacts.clone(), None, &QueryConfig::default());
        prop_assert_eq!(listed.len(), contacts.len());

        for pair in listed.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(sort_key(a) <= sort_key(b));
            // Equal keys keep stored order.
            if sort_key(a) == sort_key(b) {
                prop_assert!(position(&contacts, &a.id) < position(&contacts, &b.id));
            }
        }
    }

    #[test]
    fn filtered_listing_is_sorted_subset(contacts in contacts_strategy(), query in "[a-z]{1,3}") {
        let config = QueryConfig::default();
        let all = filter_and_sort(contacts.clone(), None, &config);
        let filtered = filter_and_sort(contacts, Some(query.as_str()), &config);

        prop_assert!(filtered.len() <= all.len());
        let positions: Vec<usize> = filtered.iter().map(|c| position(&all, &c.id)).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn blank_query_is_no_filter(contacts in contacts_strategy(), blank in "[ \t]{0,3}") {
        let config = QueryConfig::default();
        prop_assert_eq!(
            filter_and_sort(contacts.clone(), Some(blank.as_str()), &config),
            filter_and_sort(contacts, None, &config)
        );
    }
}
