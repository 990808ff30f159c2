mod model;
mod patch;

pub use model::{
    Contact, Education, EducationField, Experience, ExperienceField, Length, ProfileField,
    ResumeData, Tone, UnknownField,
};
pub use patch::ResumePatch;
