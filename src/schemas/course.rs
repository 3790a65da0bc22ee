use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Course, Material, Phase, Video};
use crate::db::types::{CourseLevel, MaterialKind};
use crate::services::pricing;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[validate(length(min = 1, message = "duration must not be empty"))]
    pub(crate) duration: String,
    #[serde(default = "default_level")]
    pub(crate) level: CourseLevel,
    #[serde(default)]
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub(crate) price: i64,
    #[serde(default)]
    pub(crate) instructor: Option<String>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    #[serde(alias = "imageUrl")]
    pub(crate) image_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) duration: Option<String>,
    #[serde(default)]
    pub(crate) level: Option<CourseLevel>,
    #[serde(default)]
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub(crate) price: Option<i64>,
    #[serde(default)]
    pub(crate) instructor: Option<String>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    #[serde(alias = "imageUrl")]
    pub(crate) image_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PhaseCreate {
    #[validate(range(min = 1, message = "phase must be positive"))]
    pub(crate) phase: i32,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[validate(length(min = 1, message = "duration must not be empty"))]
    pub(crate) duration: String,
    #[serde(default)]
    pub(crate) topics: Vec<String>,
    #[serde(default)]
    pub(crate) projects: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhaseUpdate {
    #[serde(default)]
    pub(crate) phase: Option<i32>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) duration: Option<String>,
    #[serde(default)]
    pub(crate) topics: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) projects: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct VideoCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "topicIndex")]
    pub(crate) topic_index: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MaterialCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(rename = "type")]
    pub(crate) kind: MaterialKind,
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) duration: String,
    pub(crate) level: CourseLevel,
    pub(crate) price: i64,
    pub(crate) price_label: String,
    pub(crate) instructor: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) roadmap: Vec<PhaseResponse>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PhaseResponse {
    pub(crate) phase: i32,
    pub(crate) title: String,
    pub(crate) duration: String,
    pub(crate) topics: Vec<String>,
    pub(crate) projects: Vec<String>,
    pub(crate) videos: Vec<Video>,
    pub(crate) materials: Vec<Material>,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            duration: course.duration,
            level: course.level,
            price: course.price,
            price_label: pricing::format_price(course.price),
            instructor: course.instructor,
            category: course.category,
            image_url: course.image_url,
            is_published: course.is_published,
            roadmap: course.roadmap.0.into_iter().map(PhaseResponse::from_phase).collect(),
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

impl PhaseResponse {
    pub(crate) fn from_phase(phase: Phase) -> Self {
        Self {
            phase: phase.phase,
            title: phase.title,
            duration: phase.duration,
            topics: phase.topics,
            projects: phase.projects,
            videos: phase.videos,
            materials: phase.materials,
        }
    }
}

fn default_level() -> CourseLevel {
    CourseLevel::Beginner
}
