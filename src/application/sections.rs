//! Section renderers. Each projects one slice of the content document into a
//! view model; `None` means the region has nothing to show.

use crate::{
    application::context::RenderContext,
    domain::{
        about::{EducationEntry, skill_icon, type_badge_class},
        articles::{contains_devanagari, display_date},
        gallery::GalleryList,
        page::{LANDING_LIMIT, PageContext},
    },
    presentation::views::{
        ArticleCard, ArticlesView, BadgeView, ContactView, EducationView, ExperienceView,
        GalleryTileView, GalleryView, HeroView, InstitutionView, IntroView, NewsletterView,
        SkillView, SkillsView, SocialLinkView, SocialView, WorkView,
    },
};

pub const GALLERY_EMPTY_MESSAGE: &str =
    "No photos yet. Add image filenames to the gallery array in data.json.";
pub const ARTICLES_EMPTY_MESSAGE: &str = "No articles yet. Check back soon!";
pub const CONTACT_ACTION: &str = "/ui/contact";

const DEFAULT_INTRO_TITLE: &str = "Introduction";
const DEFAULT_WORK_TITLE: &str = "Work Experience";
const DEFAULT_EDUCATION_TITLE: &str = "Education";
const DEFAULT_SKILLS_TITLE: &str = "Skills";
const DEFAULT_NEWSLETTER_TITLE: &str = "Newsletter";

/// Sanitize a rich-text field, dropping it when nothing visible remains.
fn rich_text(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(ammonia::clean(value))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn title_or(value: Option<&str>, fallback: &str) -> String {
    non_empty(value).unwrap_or_else(|| fallback.to_string())
}

pub fn render_hero(ctx: &RenderContext) -> Option<HeroView> {
    let home = ctx.document().home.as_ref()?;
    let headline = non_empty(home.headline.as_deref());
    let subline = non_empty(home.subline.as_deref());
    if headline.is_none() && subline.is_none() {
        return None;
    }
    Some(HeroView {
        headline: headline.unwrap_or_default(),
        subline,
    })
}

pub fn render_social(ctx: &RenderContext) -> Option<SocialView> {
    let social = ctx.document().social.as_ref()?;
    let links: Vec<_> = social
        .iter()
        .filter(|link| !link.link.trim().is_empty())
        .map(|link| SocialLinkView {
            name: link.name.clone(),
            href: link.link.clone(),
            icon: link.icon_name(),
        })
        .collect();
    (!links.is_empty()).then_some(SocialView { links })
}

pub fn render_intro(ctx: &RenderContext) -> Option<IntroView> {
    let intro = ctx.document().about.as_ref()?.intro.as_ref()?;
    Some(IntroView {
        title: title_or(intro.title.as_deref(), DEFAULT_INTRO_TITLE),
        description_html: rich_text(intro.description.as_deref()),
    })
}

pub fn render_work(ctx: &RenderContext) -> Option<WorkView> {
    let work = ctx.document().about.as_ref()?.work.as_ref()?;
    let experiences = work
        .experiences
        .iter()
        .map(|experience| {
            let badges = experience
                .kind
                .clone()
                .map(|kind| kind.into_vec())
                .unwrap_or_default()
                .into_iter()
                .filter(|label| !label.trim().is_empty())
                .map(|label| BadgeView {
                    class: type_badge_class(&label),
                    label,
                })
                .collect();
            ExperienceView {
                role: non_empty(experience.role.as_deref()),
                company: non_empty(experience.company.as_deref()),
                timeframe: non_empty(experience.timeframe.as_deref()),
                badges,
                achievements_html: experience
                    .achievements
                    .iter()
                    .filter_map(|item| rich_text(Some(item.as_str())))
                    .collect(),
            }
        })
        .collect();

    Some(WorkView {
        title: title_or(work.title.as_deref(), DEFAULT_WORK_TITLE),
        experiences,
    })
}

pub fn render_education(ctx: &RenderContext) -> Option<EducationView> {
    let education = ctx.document().about.as_ref()?.education.as_ref()?;
    let institutions = education
        .institutions
        .iter()
        .map(|institution| {
            let entry = EducationEntry::parse(&institution.name);
            InstitutionView {
                name: entry.name,
                years: entry.years,
                ongoing: entry.ongoing,
                description_html: rich_text(institution.description.as_deref()),
            }
        })
        .collect();

    Some(EducationView {
        title: title_or(education.title.as_deref(), DEFAULT_EDUCATION_TITLE),
        institutions,
    })
}

pub fn render_skills(ctx: &RenderContext) -> Option<SkillsView> {
    let skills = ctx.document().about.as_ref()?.skills.as_ref()?;
    let items = skills
        .items
        .iter()
        .map(|skill| SkillView {
            title: skill.title.clone().unwrap_or_default(),
            description_html: rich_text(skill.description.as_deref()),
            icon: skill_icon(skill.icon.as_deref()),
            tools: skill
                .tools
                .iter()
                .filter(|tool| !tool.trim().is_empty())
                .cloned()
                .collect(),
        })
        .collect();

    Some(SkillsView {
        title: title_or(skills.title.as_deref(), DEFAULT_SKILLS_TITLE),
        items,
    })
}

pub fn render_articles(ctx: &RenderContext) -> Option<ArticlesView> {
    let articles = ctx.document().articles.as_ref()?;
    if articles.is_empty() {
        return Some(ArticlesView {
            cards: Vec::new(),
            empty_message: Some(ARTICLES_EMPTY_MESSAGE),
            show_all_link: false,
        });
    }

    let show_all_link = ctx.page() == PageContext::Landing && articles.len() > LANDING_LIMIT;
    let cards = ctx
        .page()
        .limit(articles.iter().collect())
        .into_iter()
        .map(|article| {
            let title = article.title.clone().unwrap_or_default();
            ArticleCard {
                lang: contains_devanagari(&title).then_some("hi"),
                title,
                excerpt_html: rich_text(article.excerpt.as_deref()),
                href: non_empty(article.link.as_deref()).unwrap_or_else(|| "#".to_string()),
                date: non_empty(article.date.as_deref()).map(|date| display_date(&date)),
            }
        })
        .collect();

    Some(ArticlesView {
        cards,
        empty_message: None,
        show_all_link,
    })
}

/// Render the gallery grid and record the displayed list in the context.
pub fn render_gallery(ctx: &mut RenderContext) -> Option<GalleryView> {
    let entries = ctx.document().gallery.as_ref()?;
    let full_len = GalleryList::from_entries(entries).len();
    let list = GalleryList::for_context(entries, ctx.page());
    let page = ctx.page();

    let view = gallery_view(&list, page, full_len);
    ctx.store_gallery(list);
    Some(view)
}

/// View model for an already normalized list.
pub fn gallery_view(list: &GalleryList, page: PageContext, full_len: usize) -> GalleryView {
    let total = list.len();
    let tiles = list
        .iter()
        .enumerate()
        .map(|(index, image)| GalleryTileView {
            id: image.id.to_string(),
            url: image.url.clone(),
            alt: image.alt.clone(),
            caption: image.caption.clone(),
            index,
            total,
        })
        .collect();

    GalleryView {
        tiles,
        page: page.as_str(),
        empty_message: list.is_empty().then_some(GALLERY_EMPTY_MESSAGE),
        show_all_link: page == PageContext::Landing && full_len > total,
        live: true,
    }
}

pub fn render_newsletter(ctx: &RenderContext) -> Option<NewsletterView> {
    let newsletter = ctx.document().newsletter.as_ref()?;
    if !newsletter.display {
        return None;
    }
    Some(NewsletterView {
        title: title_or(newsletter.title.as_deref(), DEFAULT_NEWSLETTER_TITLE),
        description: non_empty(newsletter.description.as_deref()),
    })
}

/// The contact form is always present where hosted; content only prefills it.
pub fn render_contact(ctx: &RenderContext) -> ContactView {
    let contact = ctx.document().contact.clone().unwrap_or_default();
    ContactView {
        access_key: contact.access_key.unwrap_or_default(),
        subject: contact.subject.unwrap_or_default(),
        from_name: contact.from_name.unwrap_or_default(),
        action: CONTACT_ACTION.to_string(),
        live: true,
    }
}
