//! The asynchronous structure-load pipeline and view persistence.
//!
//! Loading runs parse, secondary structure, topology and views in order,
//! reporting each phase to a [`LoadProgress`] sink and awaiting it before
//! continuing. Nothing is installed until parsing has succeeded, so a
//! failed load leaves the scene as it was.

use std::future::{ready, Future};

use super::SceneController;
use crate::data_source::DataServer;
use crate::error::{LoadError, MolviewError};
use crate::view::ViewDict;

/// Pipeline stage reported to a [`LoadProgress`] sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    /// Waiting on the data source.
    Fetching,
    /// Reading atom records.
    Parsing,
    /// Classifying residues and assigning secondary structure.
    SecondaryStructure,
    /// Inferring bonds and traces.
    Topology,
    /// Building or importing views.
    Views,
    /// Finished successfully.
    Done,
    /// Aborted; the message carries the reason.
    Failed,
}

/// Receiver of user-facing load status.
pub trait LoadProgress {
    /// Report entry into `phase`. The pipeline awaits the returned future
    /// before continuing.
    fn report(
        &mut self,
        phase: LoadPhase,
        message: &str,
    ) -> impl Future<Output = ()>;
}

impl<F> LoadProgress for F
where
    F: FnMut(LoadPhase, &str),
{
    fn report(
        &mut self,
        phase: LoadPhase,
        message: &str,
    ) -> impl Future<Output = ()> {
        self(phase, message);
        ready(())
    }
}

async fn fail<P: LoadProgress>(
    progress: &mut P,
    error: LoadError,
) -> LoadError {
    log::warn!("load failed: {error}");
    progress.report(LoadPhase::Failed, &error.to_string()).await;
    error
}

impl SceneController {
    /// Parse `text` and install it as a new structure named `structure_id`.
    /// The first structure loaded into an empty scene also builds the
    /// default view; later ones leave saved views alone. Returns the new
    /// structure's index.
    ///
    /// # Errors
    ///
    /// Empty input, input without atoms and a load already in flight are
    /// reported to `progress` and returned; the scene is left unchanged.
    pub async fn load_structure<P: LoadProgress>(
        &mut self,
        structure_id: &str,
        text: &str,
        progress: &mut P,
    ) -> Result<usize, LoadError> {
        let Some(_guard) = self.gate.try_acquire() else {
            let error = LoadError::ConcurrentLoadRejected;
            return Err(fail(progress, error).await);
        };

        progress
            .report(LoadPhase::Parsing, &format!("parsing {structure_id}"))
            .await;
        let mut parsed = match self.parser.parse(text, structure_id) {
            Ok(parsed) => parsed,
            Err(e) => return Err(fail(progress, e).await),
        };
        for error in &parsed.errors {
            log::warn!("{structure_id}: skipped {error}");
        }
        if parsed.is_empty() {
            let error = LoadError::EmptyStructure {
                first_error: parsed.first_error().cloned(),
            };
            return Err(fail(progress, error).await);
        }

        let message = if parsed.has_secondary_structure {
            "applying secondary structure records"
        } else {
            "estimating secondary structure"
        };
        progress.report(LoadPhase::SecondaryStructure, message).await;
        self.soup.prepare(&mut parsed);

        progress
            .report(LoadPhase::Topology, "computing bonds and traces")
            .await;
        let was_empty = self.soup.is_empty();
        let index = self.soup.add_structure(parsed);

        progress.report(LoadPhase::Views, "building views").await;
        if was_empty {
            self.view_model.build(&self.soup);
        } else {
            self.view_model.flags_mut().is_changed = true;
        }

        let summary = format!(
            "{structure_id}: {} atoms, {} residues, {} traces",
            self.soup.atom_count(),
            self.soup.residue_count(),
            self.soup.traces().len()
        );
        log::info!("loaded {summary}");
        progress.report(LoadPhase::Done, &summary).await;
        Ok(index)
    }

    /// Fetch the structure and its saved views from `server`, load the
    /// structure, then import the views and fly to the server's default
    /// view if it names one. Both fetches finish before anything is
    /// installed.
    ///
    /// # Errors
    ///
    /// Data-source failures and load failures are reported to `progress`
    /// and returned. An unknown default view id is only logged.
    pub async fn load_from_data_server<S, P>(
        &mut self,
        server: &mut S,
        progress: &mut P,
    ) -> Result<usize, LoadError>
    where
        S: DataServer,
        P: LoadProgress,
    {
        progress
            .report(LoadPhase::Fetching, "fetching structure")
            .await;
        let data = match server.get_protein_data().await {
            Ok(data) => data,
            Err(e) => return Err(fail(progress, e).await),
        };
        let saved = match server.get_views().await {
            Ok(saved) => saved,
            Err(e) => return Err(fail(progress, e).await),
        };
        let index = self
            .load_structure(&data.structure_id, &data.structure_text, progress)
            .await?;

        if let Err(e) = self
            .view_model
            .import_views(&saved.views, saved.default_view_id.as_deref())
        {
            log::warn!("default view not applied: {e}");
        }
        Ok(index)
    }

    /// Persist every saved view to `server`.
    ///
    /// # Errors
    ///
    /// Returns the data source's failure.
    pub async fn save_views_to_server<S: DataServer>(
        &self,
        server: &mut S,
    ) -> Result<(), LoadError> {
        let dicts = self.view_model.view_dicts();
        server.save_views(&dicts).await
    }

    /// Save the current view and persist it to `server`. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns the data source's failure; the view stays saved locally.
    pub async fn save_current_view_to_server<S: DataServer>(
        &mut self,
        server: &mut S,
    ) -> Result<String, LoadError> {
        let id = self.save_current_view();
        let dicts: Vec<ViewDict> = self
            .view_model
            .saved_view(&id)
            .map(ViewDict::from)
            .into_iter()
            .collect();
        server.save_views(&dicts).await?;
        Ok(id)
    }

    /// Delete view `id` locally, then on `server`.
    ///
    /// # Errors
    ///
    /// Local refusals (default or unknown view) stop before the server is
    /// contacted; server failures are returned as [`MolviewError::Load`].
    pub async fn delete_view_on_server<S: DataServer>(
        &mut self,
        server: &mut S,
        id: &str,
    ) -> Result<(), MolviewError> {
        self.view_model.delete_view(id)?;
        server.delete_view(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{loaded, structure_text};
    use super::*;
    use crate::data_source::{MemoryDataServer, ProteinData, SavedViews};
    use crate::view::DEFAULT_VIEW_ID;

    /// Serves a structure but fails every view request.
    struct ViewsUnavailable(MemoryDataServer);

    impl DataServer for ViewsUnavailable {
        fn get_protein_data(
            &mut self,
        ) -> impl Future<Output = Result<ProteinData, LoadError>> {
            self.0.get_protein_data()
        }

        fn get_views(
            &mut self,
        ) -> impl Future<Output = Result<SavedViews, LoadError>> {
            ready(Err(LoadError::DataSource("views down".into())))
        }

        fn save_views(
            &mut self,
            views: &[ViewDict],
        ) -> impl Future<Output = Result<(), LoadError>> {
            self.0.save_views(views)
        }

        fn delete_view(
            &mut self,
            view_id: &str,
        ) -> impl Future<Output = Result<(), LoadError>> {
            self.0.delete_view(view_id)
        }
    }

    #[test]
    fn phases_are_reported_in_order() {
        let mut controller = SceneController::default();
        let mut phases = Vec::new();
        let text = structure_text(&[('A', 4)], 0.0);
        let index = pollster::block_on(controller.load_structure(
            "one",
            &text,
            &mut |phase: LoadPhase, _: &str| phases.push(phase),
        ))
        .unwrap();
        assert_eq!(index, 0);
        assert_eq!(
            phases,
            [
                LoadPhase::Parsing,
                LoadPhase::SecondaryStructure,
                LoadPhase::Topology,
                LoadPhase::Views,
                LoadPhase::Done,
            ]
        );
        assert!(!controller.load_gate().is_busy());
    }

    #[test]
    fn failed_load_leaves_scene_untouched() {
        let mut controller = loaded(&[structure_text(&[('A', 3)], 0.0)]);
        let view_before = controller.view_model().current_view().clone();
        let mut messages = Vec::new();

        let result = pollster::block_on(controller.load_structure(
            "bad",
            "REMARK nothing here\nEND\n",
            &mut |phase: LoadPhase, message: &str| {
                messages.push((phase, message.to_owned()));
            },
        ));
        assert!(matches!(result, Err(LoadError::EmptyStructure { .. })));
        assert_eq!(messages.last().map(|m| m.0), Some(LoadPhase::Failed));
        assert_eq!(controller.soup().structures().len(), 1);
        assert_eq!(controller.view_model().current_view(), &view_before);

        let empty = pollster::block_on(controller.load_structure(
            "empty",
            "",
            &mut |_: LoadPhase, _: &str| {},
        ));
        assert_eq!(empty, Err(LoadError::EmptyInput));
    }

    #[test]
    fn failed_view_fetch_installs_nothing() {
        let mut server = ViewsUnavailable(MemoryDataServer::new(ProteinData {
            structure_id: "1abc".into(),
            structure_text: structure_text(&[('A', 4)], 0.0),
        }));
        let mut controller = SceneController::default();
        let mut phases = Vec::new();
        let result = pollster::block_on(controller.load_from_data_server(
            &mut server,
            &mut |phase: LoadPhase, _: &str| phases.push(phase),
        ));
        assert_eq!(
            result,
            Err(LoadError::DataSource("views down".into()))
        );
        assert_eq!(phases, [LoadPhase::Fetching, LoadPhase::Failed]);
        assert!(controller.soup().is_empty());
        assert!(controller.soup().structures().is_empty());
        assert_eq!(controller.view_model().view_ids(), [DEFAULT_VIEW_ID]);
        assert!(!controller.load_gate().is_busy());
    }

    #[test]
    fn concurrent_load_is_rejected() {
        let mut controller = SceneController::default();
        let gate = controller.load_gate();
        let held = gate.try_acquire();
        let text = structure_text(&[('A', 2)], 0.0);
        let result = pollster::block_on(controller.load_structure(
            "one",
            &text,
            &mut |_: LoadPhase, _: &str| {},
        ));
        assert_eq!(result, Err(LoadError::ConcurrentLoadRejected));
        assert!(controller.soup().is_empty());
        drop(held);
        assert!(pollster::block_on(controller.load_structure(
            "one",
            &text,
            &mut |_: LoadPhase, _: &str| {},
        ))
        .is_ok());
    }

    #[test]
    fn controllers_sharing_a_gate_load_one_at_a_time() {
        let first = SceneController::default();
        let mut second =
            SceneController::default().with_load_gate(first.load_gate());
        let held = first.load_gate().try_acquire();
        assert!(held.is_some());
        assert!(second.load_gate().is_busy());

        let text = structure_text(&[('A', 2)], 0.0);
        let result = pollster::block_on(second.load_structure(
            "two",
            &text,
            &mut |_: LoadPhase, _: &str| {},
        ));
        assert_eq!(result, Err(LoadError::ConcurrentLoadRejected));
        drop(held);
        assert!(!first.load_gate().is_busy());
        assert!(pollster::block_on(second.load_structure(
            "two",
            &text,
            &mut |_: LoadPhase, _: &str| {},
        ))
        .is_ok());
    }

    #[test]
    fn second_structure_keeps_saved_views() {
        let mut controller = loaded(&[structure_text(&[('A', 3)], 0.0)]);
        let id = controller.save_current_view();
        let text = structure_text(&[('B', 2)], 50.0);
        let _ = pollster::block_on(controller.load_structure(
            "two",
            &text,
            &mut |_: LoadPhase, _: &str| {},
        ))
        .unwrap();
        assert!(controller.view_model().saved_view(&id).is_some());
        assert_eq!(controller.soup().structures().len(), 2);
    }

    #[test]
    fn data_server_round_trip() {
        let text = structure_text(&[('A', 3)], 0.0);
        let mut server = MemoryDataServer::new(ProteinData {
            structure_id: "1abc".into(),
            structure_text: text,
        });
        let mut first = SceneController::default();
        let _ = pollster::block_on(
            first.load_from_data_server(&mut server, &mut |_: LoadPhase, _: &str| {}),
        )
        .unwrap();
        first.set_view_text("overview");
        let id =
            pollster::block_on(first.save_current_view_to_server(&mut server))
                .unwrap();
        assert_eq!(server.views().len(), 1);

        pollster::block_on(first.save_views_to_server(&mut server)).unwrap();
        assert_eq!(server.views().len(), 2);

        let mut second = SceneController::default();
        let _ = pollster::block_on(
            second.load_from_data_server(&mut server, &mut |_: LoadPhase, _: &str| {}),
        )
        .unwrap();
        assert_eq!(second.view_model().view_ids(), [DEFAULT_VIEW_ID, id.as_str()]);
        assert_eq!(second.view_model().saved_view(&id).unwrap().text, "overview");

        pollster::block_on(second.delete_view_on_server(&mut server, &id))
            .unwrap();
        assert_eq!(server.views().len(), 1);
        assert!(matches!(
            pollster::block_on(
                second.delete_view_on_server(&mut server, DEFAULT_VIEW_ID)
            ),
            Err(MolviewError::DefaultViewUndeletable)
        ));
    }
}
