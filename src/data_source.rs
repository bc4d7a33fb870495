//! The asynchronous data-source collaborator that supplies structure text
//! and persists views. The core never performs I/O itself; hosts implement
//! [`DataServer`] over whatever transport they have.

use std::future::{ready, Future};

use crate::error::LoadError;
use crate::view::ViewDict;

/// Structure text and its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinData {
    /// Identifier the structure is installed under.
    pub structure_id: String,
    /// Fixed-column structure file contents.
    pub structure_text: String,
}

/// Persisted views plus the view to open first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedViews {
    /// View dictionaries in any order.
    pub views: Vec<ViewDict>,
    /// View to target once loading finishes.
    pub default_view_id: Option<String>,
}

/// Remote (or local) store of structures and views.
pub trait DataServer {
    /// Fetch the structure to display.
    fn get_protein_data(
        &mut self,
    ) -> impl Future<Output = Result<ProteinData, LoadError>>;

    /// Fetch the persisted views for the current structure.
    fn get_views(
        &mut self,
    ) -> impl Future<Output = Result<SavedViews, LoadError>>;

    /// Persist `views`, replacing any with the same id.
    fn save_views(
        &mut self,
        views: &[ViewDict],
    ) -> impl Future<Output = Result<(), LoadError>>;

    /// Forget the view `view_id`.
    fn delete_view(
        &mut self,
        view_id: &str,
    ) -> impl Future<Output = Result<(), LoadError>>;
}

/// In-memory [`DataServer`], used by the binary and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataServer {
    protein: Option<ProteinData>,
    saved: SavedViews,
}

impl MemoryDataServer {
    /// Server holding one structure and no views.
    #[must_use]
    pub fn new(protein: ProteinData) -> Self {
        Self {
            protein: Some(protein),
            saved: SavedViews::default(),
        }
    }

    /// Seed persisted views.
    #[must_use]
    pub fn with_views(
        mut self,
        views: Vec<ViewDict>,
        default_view_id: Option<String>,
    ) -> Self {
        self.saved = SavedViews {
            views,
            default_view_id,
        };
        self
    }

    /// Views currently persisted.
    #[must_use]
    pub fn views(&self) -> &[ViewDict] {
        &self.saved.views
    }
}

impl DataServer for MemoryDataServer {
    fn get_protein_data(
        &mut self,
    ) -> impl Future<Output = Result<ProteinData, LoadError>> {
        ready(
            self.protein.clone().ok_or_else(|| {
                LoadError::DataSource("no structure stored".into())
            }),
        )
    }

    fn get_views(
        &mut self,
    ) -> impl Future<Output = Result<SavedViews, LoadError>> {
        ready(Ok(self.saved.clone()))
    }

    fn save_views(
        &mut self,
        views: &[ViewDict],
    ) -> impl Future<Output = Result<(), LoadError>> {
        for view in views {
            match self
                .saved
                .views
                .iter_mut()
                .find(|v| v.view_id == view.view_id)
            {
                Some(existing) => existing.clone_from(view),
                None => self.saved.views.push(view.clone()),
            }
        }
        log::debug!("stored {} views", views.len());
        ready(Ok(()))
    }

    fn delete_view(
        &mut self,
        view_id: &str,
    ) -> impl Future<Output = Result<(), LoadError>> {
        let before = self.saved.views.len();
        self.saved.views.retain(|v| v.view_id != view_id);
        ready(if self.saved.views.len() == before {
            Err(LoadError::DataSource(format!("no stored view {view_id}")))
        } else {
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;

    fn dict(id: &str, text: &str) -> ViewDict {
        let mut dict = ViewDict::from(&View::default());
        dict.view_id = id.to_owned();
        dict.text = text.to_owned();
        dict
    }

    #[test]
    fn save_replaces_by_id() {
        let mut server = MemoryDataServer::default();
        pollster::block_on(server.save_views(&[dict("view:a", "one")]))
            .unwrap();
        pollster::block_on(
            server.save_views(&[dict("view:a", "two"), dict("view:b", "")]),
        )
        .unwrap();
        assert_eq!(server.views().len(), 2);
        assert_eq!(server.views()[0].text, "two");
    }

    #[test]
    fn delete_unknown_view_fails() {
        let mut server = MemoryDataServer::default()
            .with_views(vec![dict("view:a", "")], None);
        assert!(pollster::block_on(server.delete_view("view:zz")).is_err());
        pollster::block_on(server.delete_view("view:a")).unwrap();
        assert!(server.views().is_empty());
    }

    #[test]
    fn missing_structure_is_a_data_source_error() {
        let mut server = MemoryDataServer::default();
        assert!(matches!(
            pollster::block_on(server.get_protein_data()),
            Err(LoadError::DataSource(_))
        ));
    }
}
