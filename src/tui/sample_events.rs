use chrono::{Days, Local};
use newsdesk::{
    app::AppState,
    calendar::{CalendarEvent, ContentType, EventStatus, Priority},
};

/// Seeds a few days of newsroom content around today for offline demos.
pub fn add_sample_events(app: &mut AppState) {
    let today = Local::now().date_naive();

    let Some(tomorrow) = today.checked_add_days(Days::new(1)) else { return };
    let Some(yesterday) = today.checked_sub_days(Days::new(1)) else { return };
    let Some(next_week) = today.checked_add_days(Days::new(7)) else { return };

    let samples = [
        ("Morning briefing", today, 7, 0, ContentType::Newsletter, EventStatus::Published, Priority::High, "Newsletter Desk", "Politics"),
        ("Council votes on transit budget", today, 11, 30, ContentType::Breaking, EventStatus::InProgress, Priority::Urgent, "Maya Chen", "Local News"),
        ("Why the rate cut matters", today, 15, 0, ContentType::Opinion, EventStatus::Review, Priority::Medium, "Opinion Desk", "Business"),
        ("Inside the new science museum", tomorrow, 9, 0, ContentType::Feature, EventStatus::Scheduled, Priority::Medium, "Luis Ortega", "Entertainment"),
        ("Q&A with the head coach", tomorrow, 18, 0, ContentType::Interview, EventStatus::Draft, Priority::Low, "Sports Desk", "Sports"),
        ("Week in review", yesterday, 17, 0, ContentType::Article, EventStatus::Published, Priority::Medium, "Staff Writer", "Politics"),
        ("Chip shortage explainer", next_week, 10, 0, ContentType::Article, EventStatus::Scheduled, Priority::High, "Tech Desk", "Technology"),
    ];

    for (i, (title, date, hour, minute, content_type, status, priority, author, category)) in samples.into_iter().enumerate() {
        let Some(scheduled_for) = date.and_hms_opt(hour, minute, 0) else { continue };

        app.store.upsert(CalendarEvent {
            id: format!("sample_{}", i),
            title: title.to_string(),
            content_type,
            status,
            author: author.to_string(),
            category: category.to_string(),
            scheduled_for,
            priority,
            description: Some("Sample content for offline use".to_string()),
        });
    }
}
