//! Prompt formatting

use crate::fallback::{join_display, trophy_url};
use crate::NarratorConfig;
use ghprofile_analyzer::{ComprehensiveSummary, TrendSummary};
use ghprofile_models::{truncate_text, BlogPost, SkillCatalogue};

/// Marker the generator must place between the two localized versions
pub const LANG_SEPARATOR: &str = "---LANG_SEPARATOR---";

const COMMIT_MESSAGE_CHARS: usize = 60;
const DESCRIPTION_CHARS: usize = 80;
const MAX_CONTRIBUTED_REPOS: usize = 5;
const MAX_EMERGING_TOPICS: usize = 8;
const TOP_TOPICS: usize = 25;
const TOP_LANGUAGES: usize = 12;

/// Render the full prompt sent to the generative text service
pub fn build_prompt(
    summary: &ComprehensiveSummary,
    trends: &TrendSummary,
    blog_posts: &[BlogPost],
    skills: &SkillCatalogue,
    config: &NarratorConfig,
) -> String {
    let sections = [
        "You are an expert at writing professional, engaging GitHub profiles. Analyze the data \
         below and write an outstanding README.md that tells the developer's professional story \
         in an authentic way.\n\n# DEVELOPER CONTEXT"
            .to_string(),
        personal_section(summary, config),
        expertise_section(config),
        activity_section(summary, trends, config),
        recent_work_section(summary, config),
        active_repos_section(summary, config),
        recent_stars_section(summary, config),
        trends_section(trends),
        statistics_section(summary),
        blog_section(blog_posts),
        skills_section(skills),
        "---".to_string(),
        instructions_section(config),
    ];

    sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

fn personal_section(summary: &ComprehensiveSummary, config: &NarratorConfig) -> String {
    let user = &summary.user;
    let name = user
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&config.username);

    [
        "## PERSONAL INFORMATION".to_string(),
        format!("- Name: {}", name),
        format!("- Current bio: {}", or_placeholder(user.bio.as_deref(), "Not set")),
        format!("- Location: {}", or_placeholder(user.location.as_deref(), "Not provided")),
        format!("- Company: {}", or_placeholder(user.company.as_deref(), "Not provided")),
        format!("- Public repositories: {}", user.public_repos),
        format!("- Followers: {}", user.followers),
    ]
    .join("\n")
}

fn expertise_section(config: &NarratorConfig) -> String {
    if config.expertise_areas.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "## AREAS OF EXPERTISE (MUST APPEAR IN \"ABOUT ME\" AND \"CURRENT FOCUS\")".to_string(),
    ];
    lines.extend(config.expertise_areas.iter().map(|a| format!("- {}", a)));
    lines.join("\n")
}

fn activity_section(
    summary: &ComprehensiveSummary,
    trends: &TrendSummary,
    config: &NarratorConfig,
) -> String {
    let activity = &summary.activity;
    [
        format!("## RECENT ACTIVITY (last {} days)", config.recent_days),
        format!("- **Commits:** {} commits", activity.commits),
        format!(
            "- **Pull Requests:** {} created, {} reviewed",
            activity.prs_created, activity.prs_reviewed
        ),
        format!(
            "- **Issues:** {} opened, {} commented",
            activity.issues_opened, activity.issues_commented
        ),
        format!(
            "- **Repositories worked on:** {} repos",
            activity.repos_worked_on.len()
        ),
        format!("- **Activity pattern:** {}", trends.activity_pattern),
    ]
    .join("\n")
}

fn recent_work_section(summary: &ComprehensiveSummary, config: &NarratorConfig) -> String {
    let activity = &summary.activity;
    let mut lines = vec!["## RECENT WORK IN DETAIL".to_string()];

    if activity.recent_commits_detail.is_empty() {
        lines.push("No recent commits detected in public repositories".to_string());
    } else {
        lines.extend(
            activity
                .recent_commits_detail
                .iter()
                .take(config.max_recent_commits)
                .map(|c| {
                    format!(
                        "  • {}: {}",
                        c.repo,
                        truncate_text(&c.message, COMMIT_MESSAGE_CHARS)
                    )
                }),
        );
    }

    if !activity.repos_contributed.is_empty() {
        lines.push(String::new());
        lines.push("**Contributing to external projects:**".to_string());
        lines.extend(
            activity
                .repos_contributed
                .iter()
                .take(MAX_CONTRIBUTED_REPOS)
                .map(|r| format!("  • {}", r)),
        );
    }

    lines.join("\n")
}

fn active_repos_section(summary: &ComprehensiveSummary, config: &NarratorConfig) -> String {
    let mut lines = vec!["## ACTIVE OWN REPOSITORIES".to_string()];
    let active: Vec<String> = summary
        .active_repos()
        .take(config.max_active_repos)
        .map(|r| {
            format!(
                "- **{}** [{}]: {} (⭐ {}, 🍴 {})",
                r.name,
                r.language.as_deref().unwrap_or(""),
                describe(&r.description),
                r.stars,
                r.forks
            )
        })
        .collect();

    if active.is_empty() {
        lines.push("No recent activity in own repositories".to_string());
    } else {
        lines.extend(active);
    }
    lines.join("\n")
}

fn recent_stars_section(summary: &ComprehensiveSummary, config: &NarratorConfig) -> String {
    let mut lines = vec![format!(
        "## RECENTLY STARRED REPOSITORIES ({} in the last {} days)",
        summary.recent_stars.len(),
        config.recent_days
    )];

    for star in summary.recent_stars.iter().take(config.max_recent_stars) {
        lines.push(format!(
            "- **{}** [{}]: {}",
            star.name,
            star.language.as_deref().unwrap_or(""),
            describe(&star.description)
        ));
        lines.push(format!("  Topics: {}", star.topics.join("|")));
    }

    lines.join("\n")
}

fn trends_section(trends: &TrendSummary) -> String {
    let mut lines = vec![
        "## TREND ANALYSIS".to_string(),
        String::new(),
        "### Emerging Topics (recent focus)".to_string(),
    ];

    if trends.emerging_topics.is_empty() {
        lines.push("No emerging topics identified".to_string());
    } else {
        lines.extend(trends.emerging_topics.iter().take(MAX_EMERGING_TOPICS).map(|t| {
            format!(
                "- **{}**: {} of {} occurrences are recent ({}%)",
                t.topic,
                t.recent_count,
                t.total_count,
                (t.ratio() * 100.0) as u32
            )
        }));
    }

    lines.push(String::new());
    lines.push("### Growing Languages".to_string());
    lines.push(if trends.growing_languages.is_empty() {
        "No trend identified".to_string()
    } else {
        trends.growing_languages.join(", ")
    });

    lines.push(String::new());
    lines.push("### Identified Expertise Areas".to_string());
    lines.push(if trends.expertise_areas.is_empty() {
        "Still analyzing...".to_string()
    } else {
        join_display(&trends.expertise_areas)
    });

    lines.join("\n")
}

fn statistics_section(summary: &ComprehensiveSummary) -> String {
    let top_topics: Vec<String> = summary
        .all_topics
        .most_common(TOP_TOPICS)
        .into_iter()
        .map(|(t, c)| format!("{} ({})", t, c))
        .collect();
    let top_languages: Vec<String> = summary
        .all_languages
        .most_common(TOP_LANGUAGES)
        .into_iter()
        .map(|(l, c)| format!("{} ({})", l, c))
        .collect();

    [
        "## OVERALL STATISTICS".to_string(),
        format!(
            "- **Total stars given:** {} repositories",
            summary.starred.len()
        ),
        format!(
            "- **Own repositories:** {} (non-forks)",
            summary.own_repos.len()
        ),
        format!(
            "- **Unique topics explored:** {}",
            summary.all_topics.len()
        ),
        String::new(),
        format!("### Top {} Topics (by frequency)", TOP_TOPICS),
        top_topics.join(", "),
        String::new(),
        format!("### Top {} Languages", TOP_LANGUAGES),
        top_languages.join(", "),
    ]
    .join("\n")
}

fn blog_section(posts: &[BlogPost]) -> String {
    if posts.is_empty() {
        return String::new();
    }

    let mut lines = vec!["## LATEST BLOG POSTS".to_string()];
    lines.extend(
        posts
            .iter()
            .map(|p| format!("- [{}]({}) - {}", p.title, p.link, p.pub_date)),
    );
    lines.join("\n")
}

fn skills_section(skills: &SkillCatalogue) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut lines = vec!["## DECLARED SKILLS".to_string()];
    lines.extend(
        skills
            .groups
            .iter()
            .map(|g| format!("- **{}**: {}", g.category, g.skills.join(", "))),
    );
    lines.join("\n")
}

fn contact_lines(config: &NarratorConfig) -> Vec<String> {
    let contact = &config.contact;
    let mut lines = vec![format!("- GitHub: {}", config.username)];
    let optional = [
        ("Email", &contact.email),
        ("LinkedIn", &contact.linkedin),
        ("Twitter/X", &contact.twitter),
        ("Website/Blog", &contact.website),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("- {}: {}", label, value));
        }
    }
    lines
}

fn instructions_section(config: &NarratorConfig) -> String {
    let primary = &config.primary_locale;
    let secondary = &config.secondary_locale;

    let expertise_rule = if config.expertise_areas.is_empty() {
        "- Infer the main areas of expertise from topics and languages".to_string()
    } else {
        format!(
            "- **MANDATORY**: list ALL {} areas of expertise provided above, each with a fitting emoji and a specific description",
            config.expertise_areas.len()
        )
    };

    format!(
        "# YOUR MISSION

Write a professional, modern README.md with these sections:

### 1. Header
- Title with the name or username
- A subtitle capturing the professional essence (infer it from the context)
- Use the bio as inspiration if present, and improve it
- Relevant badges (location, social networks)

### 2. \"👋 About Me\" (2-3 paragraphs)
- Authentic, professional introduction
- Mention the role or specialization inferred from the data
- Highlight the main expertise based on dominant topics and languages

### 3. \"🎯 Current Focus & Interests\"
{expertise_rule}

### 4. \"🚀 Projects in Progress\"
- Based on recent commits and active repositories, at most 3-4 items
- If public activity is low, focus on explorations (recent stars)

### 5. \"🌱 Learning Now\"
- 3-5 specific items drawn from recent stars and emerging topics

### 6. \"💼 Experience & Tech Stack\"
Group by languages, frameworks, DevOps & tooling, databases and cloud as the data supports.
Use shields.io badges:
`![Name](https://img.shields.io/badge/Name-HEX?style=for-the-badge&logo=name&logoColor=white)`

### 7. \"🏆 GitHub Trophies\"
```markdown
<div align=\"center\">
  <img src=\"{trophy}\"/>
</div>
```

### 8. \"🤝 Contributions & Collaboration\"
- Mention external pull requests if any, and invite collaboration

### 9. \"📝 Latest Blog Posts\"
- If blog posts are listed above, include them as [Title](link) - date

### 10. \"📫 Where to Find Me\"
{contacts}

## CRITICAL GUIDELINES
1. Authenticity: genuine, not marketing
2. Specificity: exact names of technologies and concepts
3. Evidence: everything grounded in the data above
4. Recency: prioritize the last {recent}-{very_recent} days
5. Concise, scannable sections with emojis used sparingly

## OUTPUT FORMAT
Produce the README in TWO complete versions:
1. {primary_name} version first
2. {secondary_name} version second

Separate them with this exact marker on its own line:
{separator}

Each version must be complete and independent, link to the other at the top
(\"{primary_name} | [{secondary_name}]({secondary_file})\" and \"[{primary_name}]({primary_file}) | {secondary_name}\"),
and keep the same content, translated naturally.

Return ONLY the Markdown content, without explanations or meta-commentary.
Start directly with the {primary_name} README.",
        expertise_rule = expertise_rule,
        trophy = trophy_url(&config.username),
        contacts = contact_lines(config).join("\n"),
        recent = config.recent_days,
        very_recent = config.very_recent_days,
        primary_name = primary.name,
        secondary_name = secondary.name,
        primary_file = primary.file_name(),
        secondary_file = secondary.file_name(),
        separator = LANG_SEPARATOR,
    )
}

fn describe(description: &str) -> String {
    if description.is_empty() {
        "No description".to_string()
    } else {
        truncate_text(description, DESCRIPTION_CHARS)
    }
}
