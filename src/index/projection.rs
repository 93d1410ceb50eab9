use crate::types::{Item, KeySchema};
use std::collections::HashSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Projection {
    #[default]
    All,
    KeysOnly,
    Include(HashSet<String>),
}

impl Projection {
    // project that includes specific attributes
    pub fn include<I, S>(attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(attrs.into_iter().map(Into::into).collect())
    }

    pub fn project_item(
        &self,
        item: &Item,
        table_schema: &KeySchema,
        index_schema: &KeySchema,
    ) -> Item {
        match self {
            Projection::All => item.clone(),
            Projection::KeysOnly => {
                let key_names = self.collect_key_names(table_schema, index_schema);
                self.filter_item(item, &key_names)
            }
            Projection::Include(attrs) => {
                let mut key_names = self.collect_key_names(table_schema, index_schema);
                key_names.extend(attrs.iter().cloned());
                self.filter_item(item, &key_names)
            }
        }
    }

    fn collect_key_names(
        &self,
        table_schema: &KeySchema,
        index_schema: &KeySchema,
    ) -> HashSet<String> {
        let mut key_names = HashSet::new();

        key_names.insert(table_schema.partition_key.name.clone());
        if let Some(sk) = &table_schema.sort_key {
            key_names.insert(sk.name.clone());
        }

        key_names.insert(index_schema.partition_key.name.clone());
        if let Some(sk) = &index_schema.sort_key {
            key_names.insert(sk.name.clone());
        }

        key_names
    }

    fn filter_item(&self, item: &Item, include: &HashSet<String>) -> Item {
        item.iter()
            .filter(|(name, _)| include.contains(*name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}
