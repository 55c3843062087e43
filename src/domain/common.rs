use uuid::Uuid;

/// Ledger records addressable by a stable identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Roster entries matched by exact name.
pub trait NamedEntity {
    fn name(&self) -> &str;

    /// Case-sensitive; callers trim before storing names.
    fn is_named(&self, candidate: &str) -> bool {
        self.name() == candidate
    }
}

pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Recomputes a total from scratch, in iteration order.
pub fn sum_amounts<'a, T, I>(items: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Amounted::amount).sum()
}

/// First record carrying `id`, if any.
pub fn find_by_id<'a, T, I>(items: I, id: Uuid) -> Option<&'a T>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().find(|item| item.id() == id)
}
