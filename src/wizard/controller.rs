use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, error, info};

use super::state::{Activity, WizardState};
use super::step::Step;
use crate::ai::{ExtractionInput, ResumeAi};
use crate::capture::AudioRecorder;
use crate::error::WizardError;
use crate::export::{self, ExportError, ExportFormat, Rasterizer};
use crate::media::DataUri;
use crate::resume::{
    Education, EducationField, Experience, ExperienceField, Length, ProfileField, ResumePatch,
    Tone,
};
use crate::template::{self, TemplateId};

/// Notified when a long-running operation starts and ends, e.g. to drive a
/// spinner. `started` sees the state with `processing` already set. Both
/// methods default to doing nothing.
pub trait ProcessingObserver {
    fn started(&self, _state: &WizardState) {}
    fn finished(&self, _activity: Activity) {}
}

impl ProcessingObserver for () {}

/// Drives one résumé-building session through the four wizard steps.
///
/// Every operation first checks that no other operation is outstanding and
/// fails with [`WizardError::Busy`] otherwise. Results of AI calls are merged
/// into the record only when the call succeeds.
pub struct Wizard<A, R> {
    ai: A,
    recorder: R,
    state: WizardState,
    default_template: TemplateId,
    captured_image: Option<DataUri>,
    recording: bool,
    observer: Box<dyn ProcessingObserver>,
}

impl<A: ResumeAi, R: AudioRecorder> Wizard<A, R> {
    pub fn new(ai: A, recorder: R, default_template: TemplateId) -> Self {
        Self {
            ai,
            recorder,
            state: WizardState::new(default_template),
            default_template,
            captured_image: None,
            recording: false,
            observer: Box::new(()),
        }
    }

    pub fn with_observer(mut self, observer: impl ProcessingObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn captured_image(&self) -> Option<&DataUri> {
        self.captured_image.as_ref()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        match self.state.processing {
            Some(activity) => Err(WizardError::Busy(activity)),
            None => Ok(()),
        }
    }

    /// Text and image extraction are refused while the microphone is open.
    fn ensure_not_recording(&self) -> Result<(), WizardError> {
        if self.recording {
            return Err(WizardError::AlreadyRecording);
        }
        Ok(())
    }

    pub(crate) fn begin(&mut self, activity: Activity) -> Result<(), WizardError> {
        self.ensure_idle()?;
        debug!(%activity, "processing started");
        self.state.processing = Some(activity);
        self.observer.started(&self.state);
        Ok(())
    }

    fn finish(&mut self) {
        if let Some(activity) = self.state.processing.take() {
            self.observer.finished(activity);
        }
    }

    fn merge(&mut self, patch: ResumePatch) {
        info!(fields = ?patch.present_fields(), "merging AI result");
        patch.apply_to(&mut self.state.resume);
    }

    // --- Step 1: input ---

    async fn extract(
        &mut self,
        activity: Activity,
        input: ExtractionInput,
    ) -> Result<(), WizardError> {
        self.begin(activity)?;
        let result = self.ai.extract(&input).await;
        self.finish();

        match result {
            Ok(patch) => {
                self.merge(patch);
                info!(from = %self.state.step, to = %Step::Edit, source = input.label(), "extraction succeeded");
                self.state.step = Step::Edit;
                Ok(())
            }
            Err(e) => {
                error!(source = input.label(), "extraction failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Extracts résumé data from typed or pasted text.
    pub async fn submit_text(&mut self, text: &str) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.ensure_not_recording()?;
        if text.trim().is_empty() {
            return Err(WizardError::EmptyText);
        }
        self.extract(Activity::ExtractText, ExtractionInput::Text(text.to_string()))
            .await
    }

    /// Keeps a scanned page until [`submit_image`](Self::submit_image).
    pub fn capture_image(&mut self, image: DataUri) -> Result<(), WizardError> {
        self.ensure_idle()?;
        debug!(mime = image.mime_type(), "image captured");
        self.captured_image = Some(image);
        Ok(())
    }

    pub async fn submit_image(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.ensure_not_recording()?;
        let image = self
            .captured_image
            .clone()
            .ok_or(WizardError::NoImageCaptured)?;
        self.extract(Activity::ExtractImage, ExtractionInput::Image(image))
            .await
    }

    pub async fn start_recording(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if self.recording {
            return Err(WizardError::AlreadyRecording);
        }
        self.recorder.start().await?;
        self.recording = true;
        Ok(())
    }

    /// Stops the microphone and extracts résumé data from the clip.
    pub async fn stop_recording(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if !self.recording {
            return Err(WizardError::NotRecording);
        }
        self.recording = false;
        let clip = self.recorder.stop().await?;
        self.submit_audio(clip).await
    }

    /// Extracts résumé data from an already captured voice clip.
    pub async fn submit_audio(&mut self, clip: DataUri) -> Result<(), WizardError> {
        self.extract(Activity::ExtractAudio, ExtractionInput::Audio(clip))
            .await
    }

    // --- Step 2: edit ---

    /// Rewrites the record with the AI in the record's tone.
    pub async fn improve_text(&mut self) -> Result<(), WizardError> {
        self.begin(Activity::ImproveText)?;
        let tone = self.state.resume.tone;
        let result = self.ai.improve(&self.state.resume, tone).await;
        self.finish();

        match result {
            Ok(patch) => {
                self.merge(patch);
                Ok(())
            }
            Err(e) => {
                error!("improvement failed: {e}");
                Err(e.into())
            }
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.state.resume.set(field, value);
        Ok(())
    }

    pub fn set_tone(&mut self, tone: Tone) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.state.resume.tone = tone;
        Ok(())
    }

    pub fn set_length(&mut self, length: Length) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.state.resume.length = length;
        Ok(())
    }

    /// Appends an empty experience and returns its index.
    pub fn add_experience(&mut self) -> Result<usize, WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.experiences;
        list.push(Experience::default());
        Ok(list.len() - 1)
    }

    pub fn remove_experience(&mut self, index: usize) -> Result<Experience, WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.experiences;
        check_index("experience", index, list.len())?;
        Ok(list.remove(index))
    }

    pub fn update_experience(
        &mut self,
        index: usize,
        field: ExperienceField,
        value: String,
    ) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.experiences;
        check_index("experience", index, list.len())?;
        list[index].set(field, value);
        Ok(())
    }

    /// Appends an empty education entry and returns its index.
    pub fn add_education(&mut self) -> Result<usize, WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.education;
        list.push(Education::default());
        Ok(list.len() - 1)
    }

    pub fn remove_education(&mut self, index: usize) -> Result<Education, WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.education;
        check_index("education", index, list.len())?;
        Ok(list.remove(index))
    }

    pub fn update_education(
        &mut self,
        index: usize,
        field: EducationField,
        value: String,
    ) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.education;
        check_index("education", index, list.len())?;
        list[index].set(field, value);
        Ok(())
    }

    pub fn add_skill(&mut self, skill: String) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.state.resume.skills.push(skill);
        Ok(())
    }

    pub fn remove_skill(&mut self, index: usize) -> Result<String, WizardError> {
        self.ensure_idle()?;
        let list = &mut self.state.resume.skills;
        check_index("skill", index, list.len())?;
        Ok(list.remove(index))
    }

    // --- Step 3: photo ---

    /// Sends a photo for enhancement and stores the result as `photoUrl`.
    pub async fn process_photo(&mut self, photo: DataUri) -> Result<(), WizardError> {
        self.begin(Activity::ProcessPhoto)?;
        let result = self.ai.enhance_photo(&photo).await;
        self.finish();

        match result {
            Ok(enhanced) => {
                info!(mime = enhanced.mime_type(), "photo updated");
                self.state.resume.photo_url = Some(enhanced);
                Ok(())
            }
            Err(e) => {
                error!("photo enhancement failed: {e}");
                Err(e.into())
            }
        }
    }

    // --- Step 4: template and export ---

    pub fn set_template(&mut self, template: TemplateId) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.state.template = template;
        Ok(())
    }

    /// The current record rendered with the selected template.
    pub fn render(&self) -> String {
        template::render(&self.state.resume, self.state.template)
    }

    /// Rasterizes the current rendering to `<dir>/<prefix>-<name>.png`.
    pub async fn export_image(
        &mut self,
        rasterizer: &impl Rasterizer,
        dir: &Path,
        prefix: &str,
    ) -> Result<PathBuf, WizardError> {
        self.begin(Activity::ExportImage)?;
        let html = self.render();
        let path = dir.join(export::output_file_name(
            prefix,
            &self.state.resume.full_name,
            ExportFormat::Png,
        ));
        let result = match rasterizer.rasterize(&html).await {
            Ok(png) => write_file(&path, &png).await,
            Err(e) => Err(e),
        };
        self.finish();
        self.report_export(result, path)
    }

    /// Writes the Word-compatible document to `<dir>/<prefix>-<name>.doc`.
    pub async fn export_document(
        &mut self,
        dir: &Path,
        prefix: &str,
    ) -> Result<PathBuf, WizardError> {
        self.begin(Activity::ExportDocument)?;
        let doc = export::render_document(&self.state.resume, Utc::now());
        let path = dir.join(export::output_file_name(
            prefix,
            &self.state.resume.full_name,
            ExportFormat::Doc,
        ));
        let result = write_file(&path, doc.as_bytes()).await;
        self.finish();
        self.report_export(result, path)
    }

    fn report_export(
        &self,
        result: Result<(), ExportError>,
        path: PathBuf,
    ) -> Result<PathBuf, WizardError> {
        match result {
            Ok(()) => {
                info!(path = %path.display(), template = %self.state.template, "exported");
                Ok(path)
            }
            Err(e) => {
                error!("export failed: {e}");
                Err(e.into())
            }
        }
    }

    // --- Navigation ---

    pub fn go_to(&mut self, target: Step) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let from = self.state.step;
        if !from.can_navigate_to(target) {
            return Err(WizardError::InvalidTransition { from, to: target });
        }
        if from != target {
            info!(%from, to = %target, "navigated");
            self.state.step = target;
        }
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), WizardError> {
        let from = self.state.step;
        let target = from.next().ok_or(WizardError::EndOfWizard {
            from,
            direction: "after",
        })?;
        self.go_to(target)
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        let from = self.state.step;
        let target = from.previous().ok_or(WizardError::EndOfWizard {
            from,
            direction: "before",
        })?;
        self.go_to(target)
    }

    /// Discards everything and returns to the first step.
    pub fn restart(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.ensure_not_recording()?;
        self.state = WizardState::new(self.default_template);
        self.captured_image = None;
        info!("session restarted");
        Ok(())
    }
}

fn check_index(section: &'static str, index: usize, len: usize) -> Result<(), WizardError> {
    if index < len {
        Ok(())
    } else {
        Err(WizardError::IndexOutOfRange {
            section,
            index,
            len,
        })
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let to_error = |source| ExportError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    tokio::fs::write(path, bytes).await.map_err(to_error)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::ai::AiError;
    use crate::capture::CaptureError;
    use crate::gemini::GeminiError;
    use crate::resume::{Contact, ResumeData};

    /// Answers every call with the configured outcome and counts calls.
    #[derive(Default)]
    struct MockAi {
        patch: Option<ResumePatch>,
        photo: Option<DataUri>,
        calls: Cell<usize>,
        inputs: RefCell<Vec<ExtractionInput>>,
        tones: RefCell<Vec<Tone>>,
    }

    impl MockAi {
        fn ok(patch: ResumePatch) -> Self {
            Self {
                patch: Some(patch),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn with_photo(photo: DataUri) -> Self {
            Self {
                photo: Some(photo),
                ..Default::default()
            }
        }
    }

    fn service_error() -> AiError {
        AiError::Service(GeminiError::ApiError {
            status: 500,
            message: "mock error".into(),
        })
    }

    impl ResumeAi for MockAi {
        async fn extract(&self, input: &ExtractionInput) -> Result<ResumePatch, AiError> {
            self.calls.set(self.calls.get() + 1);
            self.inputs.borrow_mut().push(input.clone());
            self.patch.clone().ok_or_else(service_error)
        }

        async fn improve(&self, _data: &ResumeData, tone: Tone) -> Result<ResumePatch, AiError> {
            self.calls.set(self.calls.get() + 1);
            self.tones.borrow_mut().push(tone);
            self.patch.clone().ok_or_else(service_error)
        }

        async fn enhance_photo(&self, _photo: &DataUri) -> Result<DataUri, AiError> {
            self.calls.set(self.calls.get() + 1);
            self.photo.clone().ok_or_else(service_error)
        }
    }

    #[derive(Default)]
    struct FakeRecorder {
        deny: bool,
        fail_stop: bool,
        active: bool,
    }

    impl AudioRecorder for FakeRecorder {
        async fn start(&mut self) -> Result<(), CaptureError> {
            if self.deny {
                return Err(CaptureError::DeviceUnavailable("permission denied".into()));
            }
            self.active = true;
            Ok(())
        }

        async fn stop(&mut self) -> Result<DataUri, CaptureError> {
            self.active = false;
            if self.fail_stop {
                return Err(CaptureError::EmptyClip);
            }
            Ok(DataUri::from_bytes("audio/ogg", b"voice"))
        }
    }

    struct FakeRasterizer {
        fail: bool,
    }

    impl Rasterizer for FakeRasterizer {
        async fn rasterize(&self, html: &str) -> Result<Vec<u8>, ExportError> {
            if self.fail {
                return Err(ExportError::Browser("no chrome".into()));
            }
            assert!(html.contains("id=\"resume\""));
            Ok(b"\x89PNG fake".to_vec())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingObserver {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl ProcessingObserver for RecordingObserver {
        fn started(&self, state: &WizardState) {
            self.events
                .borrow_mut()
                .push(format!("start {}", state.processing_message()));
        }

        fn finished(&self, activity: Activity) {
            self.events.borrow_mut().push(format!("end {activity}"));
        }
    }

    fn wizard(ai: MockAi) -> Wizard<MockAi, FakeRecorder> {
        Wizard::new(ai, FakeRecorder::default(), TemplateId::Modern)
    }

    fn acme_patch() -> ResumePatch {
        serde_json::from_str(
            r#"{"fullName":"","jobTitle":"Frontend Developer","experiences":[
                {"company":"Acme","position":"","period":"","description":"5 years React experience"}
            ]}"#,
        )
        .unwrap()
    }

    async fn at_edit_step() -> Wizard<MockAi, FakeRecorder> {
        let mut w = wizard(MockAi::ok(acme_patch()));
        w.submit_text("5 years React experience at Acme").await.unwrap();
        w
    }

    #[tokio::test]
    async fn text_extraction_scenario() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        w.submit_text("5 years React experience at Acme").await.unwrap();

        assert_eq!(w.step(), Step::Edit);
        assert_eq!(w.state().step.number(), 2);
        let resume = &w.state().resume;
        assert_eq!(resume.experiences.len(), 1);
        assert_eq!(resume.experiences[0].company, "Acme");
        assert_eq!(resume.job_title, "Frontend Developer");
        assert!(!w.state().is_processing());
        assert_eq!(
            w.ai.inputs.borrow()[0],
            ExtractionInput::Text("5 years React experience at Acme".into())
        );
    }

    #[tokio::test]
    async fn empty_text_never_calls_ai() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        for text in ["", "   ", "\n\t"] {
            let err = w.submit_text(text).await.unwrap_err();
            assert!(matches!(err, WizardError::EmptyText));
        }
        assert_eq!(w.ai.calls.get(), 0);
        assert_eq!(w.step(), Step::Input);
    }

    #[tokio::test]
    async fn failed_extraction_stays_on_input_unchanged() {
        let mut w = wizard(MockAi::failing());
        w.set_field(ProfileField::FullName, "Ana".into()).unwrap();
        let before = w.state().resume.clone();

        let err = w.submit_text("some text").await.unwrap_err();
        assert!(matches!(err, WizardError::Ai(_)));
        assert_eq!(w.step(), Step::Input);
        assert_eq!(w.state().resume, before);
        assert!(!w.state().is_processing());
    }

    #[tokio::test]
    async fn extraction_merge_keeps_absent_fields() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        w.set_field(ProfileField::Summary, "Keeps shipping".into()).unwrap();
        w.add_skill("Rust".into()).unwrap();
        w.submit_text("text").await.unwrap();

        let resume = &w.state().resume;
        assert_eq!(resume.summary, "Keeps shipping");
        assert_eq!(resume.skills, vec!["Rust".to_string()]);
        assert_eq!(resume.contact, Contact::default());
    }

    #[tokio::test]
    async fn submit_image_requires_capture() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        let err = w.submit_image().await.unwrap_err();
        assert!(matches!(err, WizardError::NoImageCaptured));
        assert_eq!(w.ai.calls.get(), 0);

        let scan = DataUri::from_bytes("image/jpeg", b"scan");
        w.capture_image(scan.clone()).unwrap();
        w.submit_image().await.unwrap();
        assert_eq!(w.step(), Step::Edit);
        assert_eq!(w.ai.inputs.borrow()[0], ExtractionInput::Image(scan));
    }

    #[tokio::test]
    async fn recording_is_exclusive_and_extracts_on_stop() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        assert!(matches!(
            w.stop_recording().await.unwrap_err(),
            WizardError::NotRecording
        ));

        w.start_recording().await.unwrap();
        assert!(w.is_recording());
        assert!(w.recorder.active);
        assert!(matches!(
            w.start_recording().await.unwrap_err(),
            WizardError::AlreadyRecording
        ));

        w.stop_recording().await.unwrap();
        assert!(!w.is_recording());
        assert!(!w.recorder.active);
        assert_eq!(w.step(), Step::Edit);
        assert!(matches!(
            &w.ai.inputs.borrow()[0],
            ExtractionInput::Audio(clip) if clip.mime_type() == "audio/ogg"
        ));
    }

    #[tokio::test]
    async fn denied_microphone_never_starts() {
        let mut w = Wizard::new(
            MockAi::ok(acme_patch()),
            FakeRecorder {
                deny: true,
                ..Default::default()
            },
            TemplateId::Modern,
        );
        let err = w.start_recording().await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Device);
        assert!(!w.is_recording());
    }

    #[tokio::test]
    async fn failed_stop_releases_the_recording() {
        let mut w = Wizard::new(
            MockAi::ok(acme_patch()),
            FakeRecorder {
                fail_stop: true,
                ..Default::default()
            },
            TemplateId::Modern,
        );
        w.start_recording().await.unwrap();
        let err = w.stop_recording().await.unwrap_err();
        assert!(matches!(err, WizardError::Capture(CaptureError::EmptyClip)));
        assert!(!w.is_recording());
        assert_eq!(w.step(), Step::Input);
        assert_eq!(w.ai.calls.get(), 0);
        assert_eq!(w.state().resume, ResumeData::default());

        // The device is free again.
        w.start_recording().await.unwrap();
        assert!(w.is_recording());
    }

    #[tokio::test]
    async fn other_inputs_are_refused_while_recording() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        w.capture_image(DataUri::from_bytes("image/png", b"scan")).unwrap();
        w.start_recording().await.unwrap();

        assert!(matches!(
            w.submit_text("5 years React experience at Acme").await.unwrap_err(),
            WizardError::AlreadyRecording
        ));
        assert!(matches!(
            w.submit_image().await.unwrap_err(),
            WizardError::AlreadyRecording
        ));
        assert_eq!(w.ai.calls.get(), 0);
        assert_eq!(w.step(), Step::Input);

        w.stop_recording().await.unwrap();
        assert_eq!(w.ai.calls.get(), 1);
        assert_eq!(w.step(), Step::Edit);
    }

    #[tokio::test]
    async fn improve_uses_record_tone_and_merges() {
        let patch: ResumePatch = serde_json::from_str(r#"{"summary":"Results-driven"}"#).unwrap();
        let mut w = wizard(MockAi::ok(patch));
        w.set_tone(Tone::Formal).unwrap();
        w.set_field(ProfileField::FullName, "Ana".into()).unwrap();

        w.improve_text().await.unwrap();
        w.improve_text().await.unwrap();

        assert_eq!(w.state().resume.summary, "Results-driven");
        assert_eq!(w.state().resume.full_name, "Ana");
        assert_eq!(*w.ai.tones.borrow(), vec![Tone::Formal, Tone::Formal]);
    }

    #[tokio::test]
    async fn failed_improve_leaves_record() {
        let mut w = wizard(MockAi::failing());
        w.set_field(ProfileField::Summary, "original".into()).unwrap();
        assert!(w.improve_text().await.is_err());
        assert_eq!(w.state().resume.summary, "original");
        assert!(!w.state().is_processing());
    }

    #[tokio::test]
    async fn photo_success_and_failure() {
        let enhanced = DataUri::from_bytes("image/png", b"pro");
        let mut w = wizard(MockAi::with_photo(enhanced.clone()));
        w.process_photo(DataUri::from_bytes("image/jpeg", b"selfie"))
            .await
            .unwrap();
        assert_eq!(w.state().resume.photo_url, Some(enhanced));

        let mut w = wizard(MockAi::failing());
        let err = w
            .process_photo(DataUri::from_bytes("image/jpeg", b"selfie"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::External);
        assert!(w.state().resume.photo_url.is_none());
    }

    #[tokio::test]
    async fn navigation_is_pure_with_respect_to_data() {
        let mut w = at_edit_step().await;
        let data = w.state().resume.clone();

        w.next().unwrap();
        assert_eq!(w.step(), Step::Photo);
        w.next().unwrap();
        assert_eq!(w.step(), Step::Export);
        w.back().unwrap();
        w.back().unwrap();
        assert_eq!(w.step(), Step::Edit);
        w.back().unwrap();
        assert_eq!(w.step(), Step::Input);
        assert_eq!(w.state().resume, data);
    }

    #[test]
    fn input_cannot_be_skipped_by_navigation() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        let err = w.next().unwrap_err();
        assert!(matches!(
            err,
            WizardError::InvalidTransition {
                from: Step::Input,
                to: Step::Edit
            }
        ));
        assert!(w.go_to(Step::Export).is_err());
        assert!(matches!(
            w.back().unwrap_err(),
            WizardError::EndOfWizard { from: Step::Input, .. }
        ));
        assert_eq!(w.step(), Step::Input);
    }

    #[tokio::test]
    async fn empty_record_can_reach_export() {
        let patch = ResumePatch::default();
        let mut w = wizard(MockAi::ok(patch));
        w.submit_text("hi").await.unwrap();
        w.go_to(Step::Export).unwrap();
        assert_eq!(w.step(), Step::Export);
        assert_eq!(w.state().resume, ResumeData::default());
        assert!(matches!(
            w.next().unwrap_err(),
            WizardError::EndOfWizard { from: Step::Export, .. }
        ));
    }

    #[tokio::test]
    async fn restart_returns_to_empty_initial_record() {
        let mut w = at_edit_step().await;
        w.set_template(TemplateId::Tech).unwrap();
        w.set_tone(Tone::Formal).unwrap();
        w.capture_image(DataUri::from_bytes("image/png", b"x")).unwrap();
        w.go_to(Step::Export).unwrap();

        w.restart().unwrap();
        assert_eq!(w.step(), Step::Input);
        assert_eq!(w.state().resume, ResumeData::default());
        assert_eq!(w.state().template, TemplateId::Modern);
        assert!(w.captured_image().is_none());
    }

    #[test]
    fn add_then_remove_restores_experiences() {
        let mut w = wizard(MockAi::failing());
        w.add_experience().unwrap();
        w.update_experience(0, ExperienceField::Company, "Acme".into())
            .unwrap();
        let before = w.state().resume.experiences.clone();

        let index = w.add_experience().unwrap();
        assert_eq!(index, 1);
        w.remove_experience(index).unwrap();
        assert_eq!(w.state().resume.experiences, before);
        assert_eq!(w.state().resume.experiences.len(), 1);
    }

    #[test]
    fn education_and_skills_edits() {
        let mut w = wizard(MockAi::failing());
        let i = w.add_education().unwrap();
        w.update_education(i, EducationField::Degree, "BSc".into())
            .unwrap();
        assert_eq!(w.state().resume.education[0].degree, "BSc");
        assert_eq!(w.remove_education(0).unwrap().degree, "BSc");

        w.add_skill("Rust".into()).unwrap();
        w.add_skill("Rust".into()).unwrap();
        assert_eq!(w.state().resume.skills.len(), 2);
        assert_eq!(w.remove_skill(1).unwrap(), "Rust");
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut w = wizard(MockAi::failing());
        assert!(matches!(
            w.remove_experience(0).unwrap_err(),
            WizardError::IndexOutOfRange { section: "experience", index: 0, len: 0 }
        ));
        assert!(w
            .update_education(3, EducationField::Year, "2020".into())
            .is_err());
        assert!(w.remove_skill(0).is_err());
    }

    #[tokio::test]
    async fn template_switch_never_touches_record() {
        let mut w = at_edit_step().await;
        let data = w.state().resume.clone();
        for template in TemplateId::ALL {
            w.set_template(template).unwrap();
            assert_eq!(w.state().template, template);
            assert!(w.render().contains("Acme"));
        }
        assert_eq!(w.state().resume, data);
    }

    #[test]
    fn busy_wizard_rejects_everything() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        w.begin(Activity::ExtractText).unwrap();
        assert!(w.state().is_processing());

        assert!(matches!(w.go_to(Step::Input).unwrap_err(), WizardError::Busy(_)));
        assert!(matches!(w.add_experience().unwrap_err(), WizardError::Busy(_)));
        assert!(matches!(
            w.set_template(TemplateId::Tech).unwrap_err(),
            WizardError::Busy(Activity::ExtractText)
        ));
        assert!(matches!(w.restart().unwrap_err(), WizardError::Busy(_)));
        assert!(matches!(
            w.begin(Activity::ImproveText).unwrap_err(),
            WizardError::Busy(_)
        ));
    }

    #[tokio::test]
    async fn busy_wizard_rejects_ai_calls_without_calling() {
        let mut w = wizard(MockAi::ok(acme_patch()));
        w.begin(Activity::ProcessPhoto).unwrap();
        assert!(w.submit_text("text").await.is_err());
        assert!(w.improve_text().await.is_err());
        assert_eq!(w.ai.calls.get(), 0);
    }

    #[tokio::test]
    async fn observer_sees_start_and_end() {
        let observer = RecordingObserver::default();
        let events = observer.events.clone();
        let mut w = wizard(MockAi::failing()).with_observer(observer);
        let _ = w.submit_text("text").await;

        assert_eq!(
            *events.borrow(),
            vec![
                "start Analyzing your data with AI...".to_string(),
                "end Analyzing your data with AI...".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn exports_write_named_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = at_edit_step().await;
        w.set_field(ProfileField::FullName, "Ana Souza".into()).unwrap();
        let before = w.state().resume.clone();

        let png = w
            .export_image(&FakeRasterizer { fail: false }, dir.path(), "curriculo")
            .await
            .unwrap();
        assert_eq!(png, dir.path().join("curriculo-ana-souza.png"));
        assert_eq!(std::fs::read(&png).unwrap(), b"\x89PNG fake");

        let doc = w.export_document(dir.path(), "curriculo").await.unwrap();
        assert_eq!(doc, dir.path().join("curriculo-ana-souza.doc"));
        let text = std::fs::read_to_string(&doc).unwrap();
        assert!(text.contains("Frontend Developer"));

        assert_eq!(w.state().resume, before);
        assert!(!w.state().is_processing());
    }

    #[tokio::test]
    async fn failed_raster_export_clears_busy() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard(MockAi::failing());
        let err = w
            .export_image(&FakeRasterizer { fail: true }, dir.path(), "cv")
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::Export(_)));
        assert!(!w.state().is_processing());
        assert!(!dir.path().join("cv.png").exists());
    }

    #[tokio::test]
    async fn export_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("cvs");
        let mut w = wizard(MockAi::failing());
        let path = w.export_document(&nested, "cv").await.unwrap();
        assert_eq!(path, nested.join("cv.doc"));
        assert!(path.exists());
    }
}
