//! Per-section templates.

use super::template::fill;
use super::Renderer;
use crate::section::content::{
    sorted_by_display_order, Approach, Brands, Footer, FooterLink, Hero, Offer, Projects,
    Services, Testimonials, Work,
};

/// Fallback `href` for links left empty by the editor.
const EMPTY_LINK: &str = "#";

fn link_or_anchor(link: &str) -> &str {
    if link.is_empty() {
        EMPTY_LINK
    } else {
        link
    }
}

/// Emit `block` only when `url` is set.
fn optional_block(r: &Renderer, block: &str, url: &str) -> String {
    if url.is_empty() {
        String::new()
    } else {
        fill(block, &[("url", &*r.url(url))])
    }
}

// ---------------------------------------------------------------------------
// hero
// ---------------------------------------------------------------------------

const HERO: &str = r#"
<div class="hero-content">
 <h1 class="hero-title">{{title}}</h1>
 <div class="hero-description">{{description}}</div>{{video}}
</div>
"#;

const HERO_VIDEO: &str = r#"
 <div class="hero-video-wrapper">
  <video class="hero-video" autoplay muted loop playsinline src="{{url}}"></video>
 </div>"#;

pub(super) fn hero(r: &Renderer, c: &Hero) -> String {
    let video = optional_block(r, HERO_VIDEO, &c.video_url);
    fill(
        HERO,
        &[
            ("title", &*r.text(&c.title)),
            ("description", &*c.description),
            ("video", &*video),
        ],
    )
}

// ---------------------------------------------------------------------------
// brands
// ---------------------------------------------------------------------------

const BRANDS: &str = r#"
<div class="brands-wrapper">
 <h2 class="brands-title">{{title}}</h2>
 <div class="brands-logos">{{logos}}
 </div>
</div>
"#;

const BRAND_LOGO: &str = r#"
  <div class="brand-logo-item">
   <img class="brand-logo" src="{{logoUrl}}" alt="{{name}}" loading="lazy"/>
  </div>"#;

pub(super) fn brands(r: &Renderer, c: &Brands) -> String {
    let logos: String = sorted_by_display_order(&c.logos)
        .into_iter()
        .map(|logo| {
            fill(
                BRAND_LOGO,
                &[("logoUrl", &*r.url(&logo.logo_url)), ("name", &*r.text(&logo.name))],
            )
        })
        .collect();
    fill(BRANDS, &[("title", &*r.text(&c.title)), ("logos", &*logos)])
}

// ---------------------------------------------------------------------------
// services
// ---------------------------------------------------------------------------

const SERVICES: &str = r#"
<div class="services-wrapper">
 <h2 class="services-title">{{title}}</h2>
 <div class="services-description">{{description}}</div>
 <div class="services-list">{{services}}
 </div>
</div>
"#;

const SERVICE_CARD: &str = r#"
  <a class="service-card {{colorClass}}" href="{{link}}">
   <div class="service-number">{{number}}</div>
   <h3 class="service-title">{{title}}</h3>
   <div class="service-description">{{description}}</div>
  </a>"#;

pub(super) fn services(r: &Renderer, c: &Services) -> String {
    let cards: String = sorted_by_display_order(&c.services)
        .into_iter()
        .map(|s| {
            fill(
                SERVICE_CARD,
                &[
                    ("colorClass", &*r.text(&s.color_class)),
                    ("link", &*r.url(link_or_anchor(&s.link))),
                    ("number", &*r.text(&s.number)),
                    ("title", &*r.text(&s.title)),
                    ("description", &*s.description),
                ],
            )
        })
        .collect();
    fill(
        SERVICES,
        &[
            ("title", &*r.text(&c.title)),
            ("description", &*c.description),
            ("services", &*cards),
        ],
    )
}

// ---------------------------------------------------------------------------
// work
// ---------------------------------------------------------------------------

const WORK: &str = r#"
<div class="work-wrapper">
 <h2 class="work-title">{{title}}</h2>
 <div class="work-description">{{description}}</div>
 <div class="work-grid">{{items}}
 </div>
</div>
"#;

const WORK_ITEM: &str = r#"
  <a class="work-item" href="{{link}}">{{image}}
   <div class="work-item-category">{{category}}</div>
   <h3 class="work-item-title">{{title}}</h3>
  </a>"#;

const WORK_IMAGE: &str = r#"
   <img class="work-item-image" src="{{url}}" alt="" loading="lazy"/>"#;

pub(super) fn work(r: &Renderer, c: &Work) -> String {
    let items: String = sorted_by_display_order(&c.items)
        .into_iter()
        .map(|item| {
            let image = optional_block(r, WORK_IMAGE, &item.image_url);
            fill(
                WORK_ITEM,
                &[
                    ("link", &*r.url(link_or_anchor(&item.link))),
                    ("image", &*image),
                    ("category", &*r.text(&item.category)),
                    ("title", &*r.text(&item.title)),
                ],
            )
        })
        .collect();
    fill(
        WORK,
        &[
            ("title", &*r.text(&c.title)),
            ("description", &*c.description),
            ("items", &*items),
        ],
    )
}

// ---------------------------------------------------------------------------
// offer
// ---------------------------------------------------------------------------

const OFFER: &str = r#"
<div class="offer-wrapper">
 <h2 class="offer-title">{{title}}</h2>
 <ul class="offer-points">{{points}}
 </ul>
</div>
"#;

const OFFER_POINT: &str = r#"
  <li class="offer-point">{{text}}</li>"#;

pub(super) fn offer(r: &Renderer, c: &Offer) -> String {
    let points: String = sorted_by_display_order(&c.points)
        .into_iter()
        .map(|p| fill(OFFER_POINT, &[("text", &*r.text(&p.text))]))
        .collect();
    fill(OFFER, &[("title", &*r.text(&c.title)), ("points", &*points)])
}

// ---------------------------------------------------------------------------
// testimonials
// ---------------------------------------------------------------------------

const TESTIMONIALS: &str = r#"
<div class="testimonials-wrapper">
 <h2 class="testimonials-title">{{title}}</h2>
 <div class="mask w-slider-mask">{{slides}}
 </div>
</div>
"#;

const TESTIMONIAL_SLIDE: &str = r#"
  <div class="clientes-slide w-slide">
   <div class="testimonials-card">
    <div class="testimonials-card-left">
     <div class="testimonial-text u-color-dark">{{text}}</div>
     <div class="testimonials-card-person-group">{{photo}}
      <div class="testimonials-person-info">
       <div class="u-text-style-big">{{clientName}}</div>
       <div class="u-text-style-small">{{clientTitle}}</div>
      </div>
     </div>
    </div>{{project}}
   </div>
  </div>"#;

const TESTIMONIAL_PHOTO: &str = r#"
      <img class="testimonials-avatar" src="{{url}}" alt="" loading="lazy"/>"#;

const TESTIMONIAL_PROJECT: &str = r#"
    <div class="testimonials-card-right">{{image}}
     <a class="c-global-link" href="{{link}}">Voir le projet</a>
    </div>"#;

const TESTIMONIAL_PROJECT_IMAGE: &str = r#"
     <div class="testimonial_card_img">
      <img class="testimonials-person-thumb" src="{{url}}" alt="" loading="lazy"/>
     </div>"#;

pub(super) fn testimonials(r: &Renderer, c: &Testimonials) -> String {
    let slides: String = sorted_by_display_order(&c.testimonials)
        .into_iter()
        .map(|t| {
            let photo = optional_block(r, TESTIMONIAL_PHOTO, &t.client_photo);
            let project = if t.project_link.is_empty() {
                String::new()
            } else {
                let image = optional_block(r, TESTIMONIAL_PROJECT_IMAGE, &t.project_image);
                fill(
                    TESTIMONIAL_PROJECT,
                    &[("image", &*image), ("link", &*r.url(&t.project_link))],
                )
            };
            fill(
                TESTIMONIAL_SLIDE,
                &[
                    ("text", &*t.text),
                    ("photo", &*photo),
                    ("clientName", &*r.text(&t.client_name)),
                    ("clientTitle", &*r.text(&t.client_title)),
                    ("project", &*project),
                ],
            )
        })
        .collect();
    fill(
        TESTIMONIALS,
        &[("title", &*r.text(&c.title)), ("slides", &*slides)],
    )
}

// ---------------------------------------------------------------------------
// footer
// ---------------------------------------------------------------------------

const FOOTER: &str = r#"
<div class="footer-wrapper">
 <h2 class="footer-title">{{title}}</h2>{{email}}
 <div class="footer-links">
  <div class="footer-links-column" data-group="site">{{site}}
  </div>
  <div class="footer-links-column" data-group="professional">{{professional}}
  </div>
  <div class="footer-links-column" data-group="social">{{social}}
  </div>
 </div>
 <div class="footer-copyright">{{copyright}}</div>
</div>
"#;

const FOOTER_EMAIL: &str = r#"
 <a class="footer-email" href="mailto:{{url}}">{{url}}</a>"#;

const FOOTER_LINK: &str = r#"
   <a class="footer-link" href="{{url}}">{{text}}</a>"#;

fn footer_links(r: &Renderer, links: &[FooterLink]) -> String {
    links
        .iter()
        .map(|l| {
            fill(
                FOOTER_LINK,
                &[("url", &*r.url(link_or_anchor(&l.url))), ("text", &*r.text(&l.text))],
            )
        })
        .collect()
}

pub(super) fn footer(r: &Renderer, c: &Footer) -> String {
    let email = optional_block(r, FOOTER_EMAIL, &c.email);
    fill(
        FOOTER,
        &[
            ("title", &*r.text(&c.title)),
            ("email", &*email),
            ("site", &*footer_links(r, &c.links.site)),
            ("professional", &*footer_links(r, &c.links.professional)),
            ("social", &*footer_links(r, &c.links.social)),
            ("copyright", &*r.text(&c.copyright)),
        ],
    )
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

const PROJECTS: &str = r#"
<div class="projects-wrapper">
 <h2 class="projects-title">{{title}}</h2>
 <div class="projects-grid">{{projects}}
 </div>
</div>
"#;

const PROJECT_CARD: &str = r#"
  <a class="project-card" href="{{link}}">{{image}}
   <h3 class="project-card-title">{{title}}</h3>
   <div class="project-card-summary">{{summary}}</div>
  </a>"#;

const PROJECT_IMAGE: &str = r#"
   <img class="project-card-image" src="{{url}}" alt="" loading="lazy"/>"#;

pub(super) fn projects(r: &Renderer, c: &Projects) -> String {
    let cards: String = sorted_by_display_order(&c.projects)
        .into_iter()
        .map(|p| {
            let image = optional_block(r, PROJECT_IMAGE, &p.image_url);
            fill(
                PROJECT_CARD,
                &[
                    ("link", &*r.url(link_or_anchor(&p.link))),
                    ("image", &*image),
                    ("title", &*r.text(&p.title)),
                    ("summary", &*p.summary),
                ],
            )
        })
        .collect();
    fill(
        PROJECTS,
        &[("title", &*r.text(&c.title)), ("projects", &*cards)],
    )
}

// ---------------------------------------------------------------------------
// approach
// ---------------------------------------------------------------------------

const APPROACH: &str = r#"
<div class="approach-wrapper">
 <h2 class="approach-title">{{title}}</h2>
 <div class="approach-description">{{description}}</div>{{video}}
 <div class="approach-steps">{{steps}}
 </div>{{cta}}
</div>
"#;

const APPROACH_VIDEO: &str = r#"
 <div class="approach-video-wrapper">
  <video class="approach-video" autoplay muted loop playsinline src="{{url}}"></video>
 </div>"#;

const APPROACH_STEP: &str = r#"
  <div class="approach-step">
   <div class="approach-step-number">{{number}}</div>
   <h3 class="approach-step-title">{{title}}</h3>
   <div class="approach-step-description">{{description}}</div>
  </div>"#;

const APPROACH_CTA: &str = r#"
 <a class="approach-cta" href="{{url}}">{{text}}</a>"#;

pub(super) fn approach(r: &Renderer, c: &Approach) -> String {
    let video = optional_block(r, APPROACH_VIDEO, &c.video_url);
    let steps: String = sorted_by_display_order(&c.steps)
        .into_iter()
        .map(|s| {
            fill(
                APPROACH_STEP,
                &[
                    ("number", &*r.text(&s.number)),
                    ("title", &*r.text(&s.title)),
                    ("description", &*s.description),
                ],
            )
        })
        .collect();
    let cta = if c.cta_url.is_empty() {
        String::new()
    } else {
        fill(
            APPROACH_CTA,
            &[("url", &*r.url(&c.cta_url)), ("text", &*r.text(&c.cta_text))],
        )
    };
    fill(
        APPROACH,
        &[
            ("title", &*r.text(&c.title)),
            ("description", &*c.description),
            ("video", &*video),
            ("steps", &*steps),
            ("cta", &*cta),
        ],
    )
}
