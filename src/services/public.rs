//! Public site content
//!
//! Read-only gallery and stats for visitors, plus the two public forms.

use std::sync::Mutex;
use std::time::Duration;

use crate::backend::Backend;
use crate::config::FallbackStats;
use crate::db::repositories::{ApplicationRepository, GalleryRepository, MessageRepository, StatsRepository};
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{ApplicationSubmission, ContactSubmission};
use crate::views::{ListState, Notice, PublicGalleryCard, PublicStatsView};

use super::in_flight::{InFlight, OperationKey};

/// How long the contact form's success notice stays up
pub const CONTACT_NOTICE_LIFETIME: Duration = Duration::from_secs(5);

pub struct PublicGallery {
    repo: GalleryRepository,
}

impl PublicGallery {
    pub fn new(backend: &Backend) -> Self {
        Self {
            repo: GalleryRepository::new(backend.store.clone()),
        }
    }

    /// Title, description and image of every post, newest first
    pub async fn load(&self) -> ListState<PublicGalleryCard> {
        match self.repo.list_public().await {
            Ok(posts) => ListState::from_items(
                posts.into_iter().map(PublicGalleryCard::from).collect(),
                "No gallery posts have been added yet. Check back soon!",
            ),
            Err(e) => {
                tracing::error!("Error loading public gallery: {}", e);
                ListState::Error("Could not load the gallery at this time.".to_string())
            }
        }
    }
}

pub struct PublicStats {
    repo: StatsRepository,
    fallback: FallbackStats,
}

impl PublicStats {
    pub fn new(backend: &Backend, fallback: &FallbackStats) -> Self {
        Self {
            repo: StatsRepository::new(backend.store.clone()),
            fallback: fallback.clone(),
        }
    }

    /// The stored stats, or the configured fallback if they cannot be read
    pub async fn load(&self) -> PublicStatsView {
        match self.repo.get().await {
            Ok(record) => PublicStatsView::from(&record),
            Err(e) => {
                tracing::error!("Error fetching public school stats: {}", e);
                PublicStatsView::from(&self.fallback)
            }
        }
    }
}

/// Shared shape of the two public forms: one submission at a time and a
/// status notice
struct FormStatus {
    in_flight: InFlight,
    notice: Mutex<Option<Notice>>,
}

impl FormStatus {
    fn new() -> Self {
        Self {
            in_flight: InFlight::new(),
            notice: Mutex::new(None),
        }
    }

    fn show(&self, notice: Notice) {
        *self.notice.lock().unwrap_or_else(|e| e.into_inner()) = Some(notice);
    }

    fn current(&self) -> Option<Notice> {
        self.notice.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Public enrollment application form
pub struct ApplicationForm {
    repo: ApplicationRepository,
    status: FormStatus,
}

impl ApplicationForm {
    pub fn new(backend: &Backend) -> Self {
        Self {
            repo: ApplicationRepository::new(backend.store.clone()),
            status: FormStatus::new(),
        }
    }

    /// Insert the submission with its empty fields stripped
    pub async fn submit(&self, submission: ApplicationSubmission) -> ConsoleResult<()> {
        let _token = self.status.in_flight.acquire(OperationKey::new("applications", "submit"))?;
        self.status.show(Notice::pending("Submitting your application..."));

        match self.repo.submit(submission).await {
            Ok(()) => {
                tracing::info!("Application submitted");
                self.status.show(Notice::success(
                    "Application submitted successfully! We will get back to you soon.",
                ));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error submitting application: {}", e);
                self.status.show(Notice::error(format!("Error: {}. Please try again.", e.message)));
                Err(ConsoleError::query(e))
            }
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.status.current()
    }
}

/// Public contact form
pub struct ContactForm {
    repo: MessageRepository,
    status: FormStatus,
}

impl ContactForm {
    pub fn new(backend: &Backend) -> Self {
        Self {
            repo: MessageRepository::new(backend.store.clone()),
            status: FormStatus::new(),
        }
    }

    pub async fn submit(&self, submission: ContactSubmission) -> ConsoleResult<()> {
        let _token = self.status.in_flight.acquire(OperationKey::new("messages", "submit"))?;
        self.status.show(Notice::pending("Sending your message..."));

        match self.repo.submit(&submission).await {
            Ok(()) => {
                tracing::info!("Contact message received from {}", submission.email);
                self.status.show(
                    Notice::success("Message sent successfully! We will get back to you soon.")
                        .hiding_after(CONTACT_NOTICE_LIFETIME),
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error submitting message: {}", e);
                self.status.show(Notice::error(format!("Error: {}. Please try again.", e.message)));
                Err(ConsoleError::query(e))
            }
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.status.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{tables, Operation};
    use crate::testing::MemoryBackend;
    use crate::views::Tone;
    use serde_json::json;

    #[tokio::test]
    async fn test_public_gallery_columns_and_states() {
        let mem = MemoryBackend::new();
        let gallery = PublicGallery::new(&mem.backend());
        assert_eq!(
            gallery.load().await,
            ListState::Empty("No gallery posts have been added yet. Check back soon!".to_string())
        );

        mem.seed_post(1, "Choir", "gallery/u1/1-choir.jpg");
        mem.seed_post(2, "Band", "gallery/u1/2-band.jpg");
        let cards = gallery.load().await;
        assert_eq!(cards.items().len(), 2);
        assert_eq!(cards.items()[0].title, "Band");
        assert_eq!(cards.items()[0].description, "");

        mem.store.fail_on(Operation::Select, tables::GALLERY_POSTS, "offline");
        assert_eq!(
            gallery.load().await,
            ListState::Error("Could not load the gallery at this time.".to_string())
        );
    }

    #[tokio::test]
    async fn test_public_stats_fallback() {
        let mem = MemoryBackend::new();
        let fallback = FallbackStats {
            students_enrolled: 400,
            qualified_teachers: 25,
            grade_level_text: "K-6".to_string(),
        };
        let stats = PublicStats::new(&mem.backend(), &fallback);

        let view = stats.load().await;
        assert!(view.from_fallback);
        assert_eq!(view.students_enrolled, 400);

        mem.seed_stats(450, 32, "K-8");
        let view = stats.load().await;
        assert!(!view.from_fallback);
        assert_eq!(view.qualified_teachers, 32);
        assert_eq!(view.grade_level_text, "K-8");
    }

    #[tokio::test]
    async fn test_application_submission_strips_empty_fields() {
        let mem = MemoryBackend::new();
        let form = ApplicationForm::new(&mem.backend());

        let submission: ApplicationSubmission = [
            ("first_name", "Lena"),
            ("last_name", "Ortiz"),
            ("grade_level", "Grade 3"),
            ("medical_notes", ""),
        ]
        .into_iter()
        .collect();
        form.submit(submission).await.unwrap();

        let rows = mem.store.rows(tables::APPLICATIONS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "Pending");
        assert!(rows[0].get("medical_notes").is_none());
        assert_eq!(
            form.notice().map(|n| n.text),
            Some("Application submitted successfully! We will get back to you soon.".to_string())
        );
    }

    #[tokio::test]
    async fn test_application_submission_error_text() {
        let mem = MemoryBackend::new();
        mem.store.fail_on(Operation::Insert, tables::APPLICATIONS, "null value in column \"last_name\"");
        let form = ApplicationForm::new(&mem.backend());

        assert!(form
            .submit(ApplicationSubmission::new().field("first_name", "Lena"))
            .await
            .is_err());
        assert_eq!(
            form.notice(),
            Some(Notice::error("Error: null value in column \"last_name\". Please try again."))
        );
    }

    #[tokio::test]
    async fn test_contact_notice_hides_after_five_seconds() {
        let mem = MemoryBackend::new();
        let form = ContactForm::new(&mem.backend());

        form.submit(ContactSubmission {
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            subject: "Hi".to_string(),
            message: "Test".to_string(),
        })
        .await
        .unwrap();

        let notice = form.notice().unwrap();
        assert_eq!(notice.tone, Tone::Success);
        assert_eq!(notice.hide_after, Some(Duration::from_secs(5)));
        assert_eq!(mem.store.rows(tables::CONTACT_MESSAGES)[0]["name"], json!("Ana"));
    }
}
