use std::collections::HashMap;

/// Children of one parent, in first-seen order, addressable by slug.
#[derive(Debug, Clone)]
struct Scope<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Scope<T> {
    fn default() -> Self {
        Scope {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Scope<T> {
    /// Return the position of `slug`, creating the child on first sight.
    ///
    /// `create` receives the 1-based local index of the new child.
    fn get_or_insert_with(&mut self, slug: &str, create: impl FnOnce(usize) -> T) -> usize {
        if let Some(&position) = self.index.get(slug) {
            return position;
        }

        let position = self.items.len();
        self.items.push(create(position + 1));
        self.index.insert(slug.to_string(), position);
        position
    }

    fn get(&self, slug: &str) -> Option<&T> {
        self.index.get(slug).map(|&position| &self.items[position])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub slug: String,
    pub id: String,
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Street {
    pub slug: String,
    pub id: String,
    pub ordinal: bool,
    addresses: Scope<Address>,
}

impl Street {
    pub fn addresses(&self) -> &[Address] {
        &self.addresses.items
    }

    pub fn address(&self, slug: &str) -> Option<&Address> {
        self.addresses.get(slug)
    }
}

#[derive(Debug, Clone)]
pub struct Community {
    pub slug: String,
    pub id: String,
    pub number: u32,
    /// The number came from configuration rather than first-seen order.
    pub configured: bool,
    streets: Scope<Street>,
}

impl Community {
    pub fn streets(&self) -> &[Street] {
        &self.streets.items
    }

    pub fn street(&self, slug: &str) -> Option<&Street> {
        self.streets.get(slug)
    }
}

fn community_id(prefix: Option<&str>, number: u32) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}_{number}"),
        None => number.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityRef(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreetRef {
    community: usize,
    street: usize,
}

/// Community → street → address tree with identifiers fixed at first sight.
///
/// Inserting an existing slug at any level returns the existing entity; ids
/// depend only on slugs and the order in which they are first inserted.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    prefix: Option<String>,
    communities: Scope<Community>,
}

impl Hierarchy {
    /// `prefix` is prepended to every community number, e.g. `3_2_35_77` → `3_2_35_77_4`.
    pub fn new(prefix: Option<&str>) -> Self {
        Hierarchy {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            communities: Scope::default(),
        }
    }

    /// Get or create a community. Without a configured `number` the community
    /// takes the next first-seen ordinal.
    pub fn community(&mut self, slug: &str, number: Option<u32>) -> CommunityRef {
        let prefix = self.prefix.as_deref();
        let position = self.communities.get_or_insert_with(slug, |local| {
            let configured = number.is_some();
            let number = number.unwrap_or(local as u32);
            Community {
                slug: slug.to_string(),
                id: community_id(prefix, number),
                number,
                configured,
                streets: Scope::default(),
            }
        });
        CommunityRef(position)
    }

    pub fn street(&mut self, community: CommunityRef, slug: &str, ordinal: bool) -> StreetRef {
        let parent = &mut self.communities.items[community.0];
        let parent_id = &parent.id;
        let position = parent.streets.get_or_insert_with(slug, |local| Street {
            slug: slug.to_string(),
            id: format!("{parent_id}_{local}"),
            ordinal,
            addresses: Scope::default(),
        });
        StreetRef {
            community: community.0,
            street: position,
        }
    }

    /// Get or create an address, returning its id.
    pub fn address(&mut self, street: StreetRef, slug: &str, unit: Option<&str>) -> &str {
        let parent = &mut self.communities.items[street.community].streets.items[street.street];
        let parent_id = &parent.id;
        let position = parent.addresses.get_or_insert_with(slug, |local| Address {
            slug: slug.to_string(),
            id: format!("{parent_id}_{local}"),
            unit: unit.filter(|u| !u.is_empty()).map(str::to_string),
        });
        &parent.addresses.items[position].id
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities.items
    }

    pub fn get(&self, slug: &str) -> Option<&Community> {
        self.communities.get(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::Hierarchy;

    #[test]
    fn ids_follow_first_seen_order() {
        let mut hierarchy = Hierarchy::new(Some("3_2_35_77"));

        let akron = hierarchy.community("akron", None);
        let main = hierarchy.street(akron, "main_st", false);
        assert_eq!(hierarchy.address(main, "1_main_st", None), "3_2_35_77_1_1_1");
        assert_eq!(hierarchy.address(main, "3_main_st", None), "3_2_35_77_1_1_2");

        let first = hierarchy.street(akron, "1st", true);
        assert_eq!(hierarchy.address(first, "5", None), "3_2_35_77_1_2_1");

        let stow = hierarchy.community("stow", None);
        let darrow = hierarchy.street(stow, "darrow_rd", false);
        assert_eq!(hierarchy.address(darrow, "9_darrow_rd", None), "3_2_35_77_2_1_1");

        let ids: Vec<&str> = hierarchy.communities().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["3_2_35_77_1", "3_2_35_77_2"]);
        assert!(hierarchy.communities().iter().all(|c| !c.configured));
    }

    #[test]
    fn repeated_inserts_are_idempotent() {
        let mut hierarchy = Hierarchy::new(None);

        for _ in 0..5 {
            let community = hierarchy.community("akron", Some(1));
            let street = hierarchy.street(community, "summit_st", false);
            assert_eq!(hierarchy.address(street, "860_n_summit_st", None), "1_1_1");
        }

        let akron = hierarchy.get("akron").unwrap();
        assert_eq!(hierarchy.communities().len(), 1);
        assert_eq!(akron.streets().len(), 1);
        assert_eq!(akron.streets()[0].addresses().len(), 1);
    }

    #[test]
    fn configured_numbers_are_kept_verbatim() {
        let mut hierarchy = Hierarchy::new(None);

        let richfield = hierarchy.community("richfield", Some(21));
        let peninsula = hierarchy.community("peninsula", Some(19));

        assert_eq!(hierarchy.communities()[richfield.0].id, "21");
        assert_eq!(hierarchy.communities()[peninsula.0].id, "19");
        assert!(hierarchy.communities()[peninsula.0].configured);

        let street = hierarchy.street(peninsula, "riverview_rd", false);
        assert_eq!(hierarchy.address(street, "1_riverview_rd", None), "19_1_1");
    }

    #[test]
    fn local_indices_are_dense_per_parent() {
        let mut hierarchy = Hierarchy::new(Some("p"));
        let a = hierarchy.community("a", None);
        let b = hierarchy.community("b", None);

        let a1 = hierarchy.street(a, "x", false);
        let b1 = hierarchy.street(b, "x", false);
        let a2 = hierarchy.street(a, "y", false);

        assert_eq!(hierarchy.address(a1, "1", None), "p_1_1_1");
        assert_eq!(hierarchy.address(b1, "1", None), "p_2_1_1");
        assert_eq!(hierarchy.address(a2, "1", Some("b")), "p_1_2_1");

        let street = hierarchy.get("a").unwrap().street("y").unwrap();
        assert_eq!(street.address("1").unwrap().unit.as_deref(), Some("b"));
    }
}
