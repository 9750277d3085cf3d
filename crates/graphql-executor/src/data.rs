use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::{self, Debug, Formatter},
};

/// Per-request user context, keyed by type.
///
/// Resolvers reach it through [`ResolverContext::data`](crate::ResolverContext::data).
#[derive(Default)]
pub struct Data(HashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl Data {
    pub fn insert<D: Any + Send + Sync>(&mut self, data: D) {
        self.0.insert(TypeId::of::<D>(), Box::new(data));
    }

    pub fn get<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.0
            .get(&TypeId::of::<D>())
            .and_then(|data| data.downcast_ref::<D>())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Data").field(&self.0.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Data;

    struct CurrentUser(&'static str);

    #[test]
    fn lookup_by_type() {
        let mut data = Data::default();
        data.insert(CurrentUser("alice"));
        data.insert(42u32);

        assert_eq!(data.get::<CurrentUser>().map(|user| user.0), Some("alice"));
        assert_eq!(data.get::<u32>(), Some(&42));
        assert!(data.get::<String>().is_none());
    }
}
