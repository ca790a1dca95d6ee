use crate::core::directives::DirectiveName;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type DirectiveTokens = SmallVec<[Cow<'static, str>; 8]>;

type DirectiveTransform = Box<dyn Fn(DirectiveName, &mut DirectiveTokens) + Send + Sync + 'static>;
type HeaderTransform = Box<dyn Fn(&mut String) + Send + Sync + 'static>;

#[derive(Default)]
pub struct TransformRegistry {
    directive_transforms: DashMap<usize, DirectiveTransform>,
    header_transforms: DashMap<usize, HeaderTransform>,
    next_id: AtomicUsize,
}

impl TransformRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directive_transform<F>(&self, f: F) -> usize
    where
        F: Fn(DirectiveName, &mut DirectiveTokens) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.directive_transforms.insert(id, Box::new(f));
        id
    }

    #[inline]
    pub fn remove_directive_transform(&self, id: usize) -> bool {
        self.directive_transforms.remove(&id).is_some()
    }

    pub fn add_header_transform<F>(&self, f: F) -> usize
    where
        F: Fn(&mut String) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.header_transforms.insert(id, Box::new(f));
        id
    }

    #[inline]
    pub fn remove_header_transform(&self, id: usize) -> bool {
        self.header_transforms.remove(&id).is_some()
    }

    pub fn apply_directive(&self, name: DirectiveName, tokens: &mut DirectiveTokens) {
        if self.directive_transforms.is_empty() {
            return;
        }

        // Transforms run in registration order.
        let mut ids: SmallVec<[usize; 8]> =
            self.directive_transforms.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();

        for id in ids {
            if let Some(transform) = self.directive_transforms.get(&id) {
                transform.value()(name, tokens);
            }
        }
    }

    pub fn apply_header(&self, value: &mut String) {
        if self.header_transforms.is_empty() {
            return;
        }

        let mut ids: SmallVec<[usize; 8]> =
            self.header_transforms.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();

        for id in ids {
            if let Some(transform) = self.header_transforms.get(&id) {
                transform.value()(value);
            }
        }
    }

    #[inline]
    pub fn has_directive_transforms(&self) -> bool {
        !self.directive_transforms.is_empty()
    }

    #[inline]
    pub fn has_header_transforms(&self) -> bool {
        !self.header_transforms.is_empty()
    }
}
