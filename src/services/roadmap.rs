use thiserror::Error;

use crate::db::models::{Course, Material, Phase, Video};

#[derive(Debug, Error, PartialEq)]
pub(crate) enum RoadmapError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("phase {0} already exists in this roadmap")]
    DuplicatePhase(i32),
    #[error("phase {0} not found in this roadmap")]
    PhaseNotFound(i32),
    #[error("video {0} not found in phase")]
    VideoNotFound(String),
    #[error("material {0} not found in phase")]
    MaterialNotFound(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NewPhase {
    pub(crate) phase: i32,
    pub(crate) title: String,
    pub(crate) duration: String,
    pub(crate) topics: Vec<String>,
    pub(crate) projects: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PhasePatch {
    pub(crate) phase: Option<i32>,
    pub(crate) title: Option<String>,
    pub(crate) duration: Option<String>,
    pub(crate) topics: Option<Vec<String>>,
    pub(crate) projects: Option<Vec<String>>,
}

/// A scoped copy of a course roadmap. All edits mutate the draft only; the
/// stored course is untouched until the caller commits the draft back through
/// the repository. The phase list is re-sorted after every mutation so that
/// phase numbers stay unique and ascending.
#[derive(Debug, Clone)]
pub(crate) struct RoadmapDraft {
    phases: Vec<Phase>,
}

impl RoadmapDraft {
    pub(crate) fn snapshot(course: &Course) -> Self {
        Self { phases: course.roadmap.0.clone() }
    }

    #[cfg(test)]
    pub(crate) fn from_phases(phases: Vec<Phase>) -> Self {
        let mut draft = Self { phases };
        draft.normalize();
        draft
    }

    pub(crate) fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Commit the draft: hand the edited phases back for persistence.
    pub(crate) fn into_phases(self) -> Vec<Phase> {
        self.phases
    }

    pub(crate) fn add_phase(&mut self, input: NewPhase) -> Result<(), RoadmapError> {
        if input.title.trim().is_empty() {
            return Err(RoadmapError::MissingField("title"));
        }
        if input.duration.trim().is_empty() {
            return Err(RoadmapError::MissingField("duration"));
        }
        if self.phases.iter().any(|existing| existing.phase == input.phase) {
            return Err(RoadmapError::DuplicatePhase(input.phase));
        }

        self.phases.push(Phase {
            phase: input.phase,
            title: input.title.trim().to_string(),
            duration: input.duration.trim().to_string(),
            topics: input.topics,
            projects: input.projects,
            videos: Vec::new(),
            materials: Vec::new(),
        });
        self.normalize();
        Ok(())
    }

    pub(crate) fn edit_phase(
        &mut self,
        phase_number: i32,
        patch: PhasePatch,
    ) -> Result<(), RoadmapError> {
        if let Some(new_number) = patch.phase {
            if new_number != phase_number
                && self.phases.iter().any(|existing| existing.phase == new_number)
            {
                return Err(RoadmapError::DuplicatePhase(new_number));
            }
        }

        let entry = self
            .phases
            .iter_mut()
            .find(|existing| existing.phase == phase_number)
            .ok_or(RoadmapError::PhaseNotFound(phase_number))?;

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(RoadmapError::MissingField("title"));
            }
            entry.title = title.trim().to_string();
        }
        if let Some(duration) = patch.duration {
            if duration.trim().is_empty() {
                return Err(RoadmapError::MissingField("duration"));
            }
            entry.duration = duration.trim().to_string();
        }
        if let Some(topics) = patch.topics {
            entry.topics = topics;
        }
        if let Some(projects) = patch.projects {
            entry.projects = projects;
        }
        if let Some(new_number) = patch.phase {
            entry.phase = new_number;
        }

        self.normalize();
        Ok(())
    }

    pub(crate) fn remove_phase(&mut self, phase_number: i32) -> Result<(), RoadmapError> {
        let before = self.phases.len();
        self.phases.retain(|existing| existing.phase != phase_number);
        if self.phases.len() == before {
            return Err(RoadmapError::PhaseNotFound(phase_number));
        }
        self.normalize();
        Ok(())
    }

    pub(crate) fn add_video(&mut self, phase_number: i32, video: Video) -> Result<(), RoadmapError> {
        if video.title.trim().is_empty() {
            return Err(RoadmapError::MissingField("title"));
        }
        if video.url.trim().is_empty() {
            return Err(RoadmapError::MissingField("url"));
        }
        let entry = self.phase_mut(phase_number)?;
        entry.videos.push(video);
        Ok(())
    }

    pub(crate) fn remove_video(
        &mut self,
        phase_number: i32,
        video_id: &str,
    ) -> Result<(), RoadmapError> {
        let entry = self.phase_mut(phase_number)?;
        let before = entry.videos.len();
        entry.videos.retain(|video| video.id != video_id);
        if entry.videos.len() == before {
            return Err(RoadmapError::VideoNotFound(video_id.to_string()));
        }
        Ok(())
    }

    pub(crate) fn add_material(
        &mut self,
        phase_number: i32,
        material: Material,
    ) -> Result<(), RoadmapError> {
        if material.title.trim().is_empty() {
            return Err(RoadmapError::MissingField("title"));
        }
        if material.url.trim().is_empty() {
            return Err(RoadmapError::MissingField("url"));
        }
        let entry = self.phase_mut(phase_number)?;
        entry.materials.push(material);
        Ok(())
    }

    pub(crate) fn remove_material(
        &mut self,
        phase_number: i32,
        material_id: &str,
    ) -> Result<(), RoadmapError> {
        let entry = self.phase_mut(phase_number)?;
        let before = entry.materials.len();
        entry.materials.retain(|material| material.id != material_id);
        if entry.materials.len() == before {
            return Err(RoadmapError::MaterialNotFound(material_id.to_string()));
        }
        Ok(())
    }

    fn phase_mut(&mut self, phase_number: i32) -> Result<&mut Phase, RoadmapError> {
        self.phases
            .iter_mut()
            .find(|existing| existing.phase == phase_number)
            .ok_or(RoadmapError::PhaseNotFound(phase_number))
    }

    fn normalize(&mut self) {
        self.phases.sort_by_key(|entry| entry.phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::MaterialKind;

    fn new_phase(number: i32, title: &str) -> NewPhase {
        NewPhase {
            phase: number,
            title: title.to_string(),
            duration: "2 weeks".to_string(),
            topics: vec!["intro".to_string()],
            projects: vec![],
        }
    }

    fn assert_sorted_unique(draft: &RoadmapDraft) {
        let numbers: Vec<i32> = draft.phases().iter().map(|entry| entry.phase).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(numbers, sorted, "roadmap must stay unique and ascending: {numbers:?}");
    }

    #[test]
    fn add_phase_keeps_roadmap_sorted() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        draft.add_phase(new_phase(3, "Advanced")).unwrap();
        draft.add_phase(new_phase(1, "Basics")).unwrap();
        draft.add_phase(new_phase(2, "Intermediate")).unwrap();

        assert_sorted_unique(&draft);
        assert_eq!(draft.phases()[0].title, "Basics");
        assert_eq!(draft.phases()[2].title, "Advanced");
    }

    #[test]
    fn add_phase_rejects_duplicate_number() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        draft.add_phase(new_phase(1, "Basics")).unwrap();
        let err = draft.add_phase(new_phase(1, "Other")).unwrap_err();
        assert_eq!(err, RoadmapError::DuplicatePhase(1));
    }

    #[test]
    fn add_phase_rejects_blank_title_and_duration() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        let mut missing_title = new_phase(1, "  ");
        assert_eq!(draft.add_phase(missing_title.clone()).unwrap_err(), RoadmapError::MissingField("title"));
        missing_title.title = "Basics".to_string();
        missing_title.duration = " ".to_string();
        assert_eq!(draft.add_phase(missing_title).unwrap_err(), RoadmapError::MissingField("duration"));
        assert!(draft.phases().is_empty());
    }

    #[test]
    fn renumbering_a_phase_resorts_the_roadmap() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        draft.add_phase(new_phase(1, "Basics")).unwrap();
        draft.add_phase(new_phase(2, "Intermediate")).unwrap();

        draft
            .edit_phase(1, PhasePatch { phase: Some(5), ..PhasePatch::default() })
            .unwrap();

        assert_sorted_unique(&draft);
        assert_eq!(draft.phases()[0].title, "Intermediate");
        assert_eq!(draft.phases()[1].phase, 5);
    }

    #[test]
    fn renumbering_onto_an_existing_phase_is_rejected() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        draft.add_phase(new_phase(1, "Basics")).unwrap();
        draft.add_phase(new_phase(2, "Intermediate")).unwrap();

        let err = draft
            .edit_phase(1, PhasePatch { phase: Some(2), ..PhasePatch::default() })
            .unwrap_err();
        assert_eq!(err, RoadmapError::DuplicatePhase(2));
    }

    #[test]
    fn mixed_operation_sequence_keeps_ordering() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        draft.add_phase(new_phase(2, "B")).unwrap();
        draft.add_phase(new_phase(4, "D")).unwrap();
        draft.add_phase(new_phase(1, "A")).unwrap();
        draft.remove_phase(2).unwrap();
        draft.add_phase(new_phase(3, "C")).unwrap();
        draft
            .edit_phase(4, PhasePatch { phase: Some(2), ..PhasePatch::default() })
            .unwrap();

        assert_sorted_unique(&draft);
        let titles: Vec<&str> =
            draft.phases().iter().map(|entry| entry.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "D", "C"]);
    }

    #[test]
    fn remove_missing_phase_errors() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        assert_eq!(draft.remove_phase(7).unwrap_err(), RoadmapError::PhaseNotFound(7));
    }

    #[test]
    fn videos_and_materials_attach_to_their_phase() {
        let mut draft = RoadmapDraft::from_phases(vec![]);
        draft.add_phase(new_phase(1, "Basics")).unwrap();

        draft
            .add_video(
                1,
                Video {
                    id: "v1".to_string(),
                    title: "Welcome".to_string(),
                    url: "https://videos.example/1".to_string(),
                    description: None,
                    topic_index: Some(0),
                },
            )
            .unwrap();
        draft
            .add_material(
                1,
                Material {
                    id: "m1".to_string(),
                    title: "Syllabus".to_string(),
                    kind: MaterialKind::Document,
                    url: "https://docs.example/syllabus.pdf".to_string(),
                    description: None,
                },
            )
            .unwrap();

        assert_eq!(draft.phases()[0].videos.len(), 1);
        assert_eq!(draft.phases()[0].materials.len(), 1);

        draft.remove_video(1, "v1").unwrap();
        assert!(draft.phases()[0].videos.is_empty());
        assert_eq!(
            draft.remove_material(1, "nope").unwrap_err(),
            RoadmapError::MaterialNotFound("nope".to_string())
        );
    }

    #[test]
    fn draft_edits_do_not_touch_the_source_phases() {
        let original = vec![Phase {
            phase: 1,
            title: "Basics".to_string(),
            duration: "2 weeks".to_string(),
            topics: vec![],
            projects: vec![],
            videos: vec![],
            materials: vec![],
        }];
        let mut draft = RoadmapDraft::from_phases(original.clone());
        draft.add_phase(new_phase(2, "More")).unwrap();

        assert_eq!(original.len(), 1, "snapshot editing must not alias the source");
        assert_eq!(draft.phases().len(), 2);
    }
}
