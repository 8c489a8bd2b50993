//! Plain-text renderers for terminal output.

use chrono::NaiveDateTime;
use parnaso_core::analytics::{CalendarDay, DashboardView, TrophyIcon, TrophyStatus};
use parnaso_core::format::{format_target, format_words, format_words_compact, progress_bar};
use parnaso_core::{GlobalStats, Project, UserSettings, GENERAL_KEY};

const BAR_WIDTH: usize = 20;

pub fn print_dashboard(user: &str, view: &DashboardView, projects: &[Project], now: NaiveDateTime) {
    let scope = match &view.project {
        Some(project) => project.name.as_str(),
        None => "All projects",
    };

    println!();
    println!("{} · {} · {}", user, scope, view.filter.display_name());
    println!("{}", "=".repeat(60));
    println!();

    println!("SUMMARY");
    println!(
        "   Words:    {:<12} Sessions: {}",
        format_words(view.totals.total_words),
        view.totals.session_count
    );
    println!(
        "   Average:  {:<12} Stress:   {:.1}",
        format_words(view.totals.average_words_per_session),
        view.totals.average_stress
    );
    println!("   Streak:   {}", view.streak_display());
    if let Some(project) = &view.project {
        println!(
            "   Target:   {:<12} {} {}%",
            format_target(project.target_word_count),
            progress_bar(view.project_progress, BAR_WIDTH),
            view.project_progress
        );
    }
    println!();

    println!("GOALS");
    println!(
        "   Today:    {:>7} / {:<7} {} {}%{}",
        format_words(view.goals.words_today),
        format_words(view.goals.daily_goal),
        progress_bar(view.goals.daily_progress, BAR_WIDTH),
        view.goals.daily_progress,
        if view.goals.daily_goal_met() { "  goal met" } else { "" }
    );
    println!(
        "   7 days:   {:>7} / {:<7} {} {}%",
        format_words(view.goals.words_last_week),
        format_words(view.goals.weekly_goal),
        progress_bar(view.goals.weekly_progress, BAR_WIDTH),
        view.goals.weekly_progress
    );
    println!();

    if view.totals.session_count == 0 {
        println!("   No sessions in this range.");
        println!();
    } else {
        println!("WORDS PER DAY");
        for day in &view.words_over_time {
            let split: Vec<String> = day
                .by_project
                .iter()
                .map(|(key, words)| format!("{} {}", project_label(key, projects), format_words(*words)))
                .collect();
            println!(
                "   {}  {:>7}  {}",
                day.label,
                format_words_compact(day.total),
                split.join(", ")
            );
        }
        println!();

        println!("SESSIONS (stress / difficulty / rating)");
        for point in &view.metrics {
            println!(
                "   {}  {} / {} / {}",
                point.label, point.stress_level, point.difficulty_level, point.session_rating
            );
        }
        println!();

        if !view.strategies.is_empty() {
            println!("STRATEGIES");
            for usage in &view.strategies {
                println!("   {:<16} {:>4}", usage.strategy.label(), usage.sessions);
            }
            println!();
        }
    }

    println!("CALENDAR {}", now.format("%B %Y"));
    print_calendar(&view.calendar);
    println!();

    println!(
        "TROPHIES {}/{} unlocked",
        view.unlocked_count(),
        view.trophies.len()
    );
    println!();
}

fn project_label<'a>(key: &'a str, projects: &'a [Project]) -> &'a str {
    if key == GENERAL_KEY {
        return "General";
    }
    projects
        .iter()
        .find(|p| p.id == key)
        .map(|p| p.name.as_str())
        .unwrap_or(key)
}

fn print_calendar(cells: &[Option<CalendarDay>]) {
    println!("   Su Mo Tu We Th Fr Sa");
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "  ".to_string(),
                Some(day) if day.has_session => " *".to_string(),
                Some(day) => format!("{:>2}", day.day),
            })
            .collect();
        println!("   {}", row.join(" "));
    }
}

pub fn print_trophies(trophies: &[TrophyStatus]) {
    let unlocked = trophies.iter().filter(|t| t.unlocked).count();

    println!();
    println!("TROPHIES {}/{} unlocked", unlocked, trophies.len());
    println!();
    for status in trophies {
        let mark = if status.unlocked { "[x]" } else { "[ ]" };
        println!(
            "   {} {} {:<16} {} {:>3}%  {}",
            mark,
            icon(status.trophy.icon),
            status.trophy.title,
            progress_bar(status.progress_pct, 10),
            status.progress_pct,
            status.trophy.description
        );
    }
    println!();
}

fn icon(icon: TrophyIcon) -> &'static str {
    match icon {
        TrophyIcon::Fire => "🔥",
        TrophyIcon::Shield => "🛡",
        TrophyIcon::Medal => "🏅",
        TrophyIcon::Trophy => "🏆",
        TrophyIcon::Crown => "👑",
    }
}

pub fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects yet.");
        return;
    }

    println!("{:<38} {:<24} {:<10} {:>10}", "ID", "NAME", "STATUS", "TARGET");
    for project in projects {
        println!(
            "{:<38} {:<24} {:<10} {:>10}",
            project.id,
            project.name,
            project.status.as_str(),
            format_target(project.target_word_count)
        );
    }
}

pub fn print_settings(user: &str, settings: &UserSettings) {
    println!("Goals for {}", user);
    println!("   Daily:  {} words", format_words(settings.daily_word_goal));
    println!("   Weekly: {} words", format_words(settings.weekly_word_goal));
}

pub fn print_global_stats(users: usize, stats: &GlobalStats) {
    println!("Users:    {}", users);
    println!("Sessions: {}", stats.total_sessions);
    println!("Words:    {}", format_words(stats.total_words));
}
