use crate::condition::AttributePath;
use crate::types::AttributeValue;

#[derive(Debug, Clone)]
pub enum UpdateAction {
    Set {
        path: AttributePath,
        value: AttributeValue,
    },
    SetIfNotExists {
        path: AttributePath,
        value: AttributeValue,
    },
    Remove {
        path: AttributePath,
    },
    Add {
        path: AttributePath,
        value: AttributeValue,
    },
    Delete {
        path: AttributePath,
        value: AttributeValue,
    },
    /// SET #p = list_append(#p, :vals) (or with the arguments reversed).
    /// `prepend` selects whether `values` goes before or after the list
    /// currently stored at `path`.
    AppendList {
        path: AttributePath,
        values: Vec<AttributeValue>,
        prepend: bool,
    },
}

impl UpdateAction {
    pub fn is_set(&self) -> bool {
        matches!(
            self,
            Self::Set { .. } | Self::SetIfNotExists { .. } | Self::AppendList { .. }
        )
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

#[derive(Debug, Default, Clone)]
pub struct UpdateExpression {
    actions: Vec<UpdateAction>,
}

impl UpdateExpression {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn set(mut self, path: impl Into<AttributePath>, value: impl Into<AttributeValue>) -> Self {
        self.actions.push(UpdateAction::Set {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn set_if_not_exists(
        mut self,
        path: impl Into<AttributePath>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.actions.push(UpdateAction::SetIfNotExists {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn remove(mut self, path: impl Into<AttributePath>) -> Self {
        self.actions
            .push(UpdateAction::Remove { path: path.into() });
        self
    }

    pub fn add(mut self, path: impl Into<AttributePath>, value: impl Into<AttributeValue>) -> Self {
        self.actions.push(UpdateAction::Add {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn delete(
        mut self,
        path: impl Into<AttributePath>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.actions.push(UpdateAction::Delete {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn append_list(
        mut self,
        path: impl Into<AttributePath>,
        values: Vec<AttributeValue>,
        prepend: bool,
    ) -> Self {
        self.actions.push(UpdateAction::AppendList {
            path: path.into(),
            values,
            prepend,
        });
        self
    }

    pub fn with_action(mut self, action: UpdateAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
