//! Recurring generation sweep.
//!
//! On each tick the sweep checks whether today is one of the configured
//! active days and, if so, creates a pending-review draft for every active
//! platform using that day's topic. One platform failing does not stop the
//! sweep; failures are logged and the remaining platforms still get drafts.

use anyhow::Result;
use chrono::{Datelike, Utc, Weekday};
use tokio_cron_scheduler::{Job, JobScheduler};

use super::ServerDeps;
use crate::domains::posts::activities::create_post;

/// Start the cron-driven generation sweep. The returned scheduler must be
/// kept alive for jobs to keep firing.
pub async fn start_scheduler(deps: ServerDeps, cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job_deps = deps.clone();
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let deps = job_deps.clone();
        Box::pin(async move {
            match run_daily_generation(&deps).await {
                Ok(created) => {
                    tracing::info!(created, "Generation sweep finished");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Generation sweep failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron, "Generation sweep scheduled");

    Ok(scheduler)
}

/// Run the sweep for today. Returns the number of drafts created.
pub async fn run_daily_generation(deps: &ServerDeps) -> Result<usize> {
    run_generation_for_day(deps, Utc::now().weekday()).await
}

async fn run_generation_for_day(deps: &ServerDeps, day: Weekday) -> Result<usize> {
    let settings = deps.settings.get_or_default().await?;

    if !settings.is_active_day(day) {
        tracing::debug!(?day, "Not an active posting day, skipping sweep");
        return Ok(0);
    }

    let topic = settings.topic_for(day).to_string();
    let mut created = 0;

    for platform in deps.platforms.list().await? {
        if !platform.active {
            continue;
        }
        match create_post(deps, platform.id, Some(topic.clone())).await {
            Ok(post) => {
                created += 1;
                tracing::info!(
                    platform = %platform.name,
                    post_id = %post.id,
                    "Sweep created draft for review"
                );
            }
            Err(e) => {
                tracing::warn!(
                    platform = %platform.name,
                    error = %e,
                    "Sweep failed for platform, continuing"
                );
            }
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::platforms::models::Platform;
    use crate::domains::posts::models::PostStatus;
    use crate::kernel::test_dependencies::{MockContentGenerator, TestDependencies};

    async fn activate_day(deps: &ServerDeps, day: Weekday) {
        let mut settings = deps.settings.get_or_default().await.unwrap();
        settings.active_days.insert(day);
        deps.settings.put(settings).await.unwrap();
    }

    #[tokio::test]
    async fn sweep_creates_a_draft_per_active_platform() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        activate_day(&deps, Weekday::Tue).await;
        test_deps
            .seed_platform(&deps, Platform::new("Facebook", "Casual tone"))
            .await;
        test_deps
            .seed_platform(&deps, Platform::new("X", "Max 280 characters"))
            .await;

        let created = run_generation_for_day(&deps, Weekday::Tue).await.unwrap();

        assert_eq!(created, 2);
        let posts = deps.posts.list().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.status == PostStatus::PendingReview));
    }

    #[tokio::test]
    async fn sweep_skips_inactive_platforms() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        activate_day(&deps, Weekday::Tue).await;
        test_deps
            .seed_platform(&deps, Platform::new("Facebook", "Casual tone"))
            .await;
        let mut dormant = Platform::new("LinkedIn", "Professional tone");
        dormant.active = false;
        test_deps.seed_platform(&deps, dormant).await;

        let created = run_generation_for_day(&deps, Weekday::Tue).await.unwrap();

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn sweep_does_nothing_on_inactive_day() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        let mut settings = deps.settings.get_or_default().await.unwrap();
        settings.active_days.remove(&Weekday::Sun);
        deps.settings.put(settings).await.unwrap();
        test_deps
            .seed_platform(&deps, Platform::new("Facebook", "Casual tone"))
            .await;

        let created = run_generation_for_day(&deps, Weekday::Sun).await.unwrap();

        assert_eq!(created, 0);
        assert!(deps.posts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_failing_platform_does_not_stop_the_sweep() {
        let test_deps = TestDependencies::new().mock_generator(
            MockContentGenerator::new()
                .with_text_error("provider down")
                .with_text("Second platform draft"),
        );
        let deps = test_deps.clone().into_deps();
        activate_day(&deps, Weekday::Tue).await;
        test_deps
            .seed_platform(&deps, Platform::new("Facebook", "Casual tone"))
            .await;
        test_deps
            .seed_platform(&deps, Platform::new("X", "Max 280 characters"))
            .await;

        let created = run_generation_for_day(&deps, Weekday::Tue).await.unwrap();

        assert_eq!(created, 1);
        let posts = deps.posts.list().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "Second platform draft");
    }

    #[tokio::test]
    async fn sweep_uses_the_days_topic_override() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        let mut settings = deps.settings.get_or_default().await.unwrap();
        settings.active_days.insert(Weekday::Thu);
        settings
            .topic_overrides
            .insert(Weekday::Thu, "Throwback repair stories".to_string());
        deps.settings.put(settings).await.unwrap();
        test_deps
            .seed_platform(&deps, Platform::new("Facebook", "Casual tone"))
            .await;

        run_generation_for_day(&deps, Weekday::Thu).await.unwrap();

        let calls = test_deps.generator.text_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].topic, "Throwback repair stories");
    }
}
