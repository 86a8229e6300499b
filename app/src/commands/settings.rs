//! Site settings commands
use shopfront_core::{SiteSettings, Storefront};

use super::print_json;
use crate::cli::SettingsArgs;

pub async fn show(store: &Storefront) -> anyhow::Result<()> {
    print_json(&store.site_settings().await)
}

/// Stream settings changes until Ctrl-C
pub async fn watch(store: &Storefront) -> anyhow::Result<()> {
    let mut watch = store.watch_settings();
    if let Some(cached) = watch.latest() {
        print_json(&cached)?;
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = watch.changed() => {
                if !changed {
                    break;
                }
                if let Some(settings) = watch.latest() {
                    print_json(&settings)?;
                }
            }
        }
    }

    watch.cancel();
    Ok(())
}

/// Merge the given fields over the current settings and save them
pub async fn update(store: &Storefront, args: SettingsArgs) -> anyhow::Result<()> {
    let current = store.admin_settings().await?;
    let saved = store.update_settings(merge(current, args)).await?;
    print_json(&saved)
}

fn merge(mut settings: SiteSettings, args: SettingsArgs) -> SiteSettings {
    let SettingsArgs {
        site_name,
        tagline,
        contact_email,
        contact_phone,
        address,
        hero_image,
        logo_url,
    } = args;

    for (field, value) in [
        (&mut settings.site_name, site_name),
        (&mut settings.tagline, tagline),
        (&mut settings.contact_email, contact_email),
        (&mut settings.contact_phone, contact_phone),
        (&mut settings.address, address),
        (&mut settings.hero_image, hero_image),
        (&mut settings.logo_url, logo_url),
    ] {
        if value.is_some() {
            *field = value;
        }
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_changes() -> SettingsArgs {
        SettingsArgs {
            site_name: None,
            tagline: None,
            contact_email: None,
            contact_phone: None,
            address: None,
            hero_image: None,
            logo_url: None,
        }
    }

    #[test]
    fn test_merge_changes_only_given_fields() {
        let mut current = SiteSettings {
            site_name: Some("Corner Shop".to_string()),
            tagline: Some("Open late".to_string()),
            logo_url: Some("/logo.png".to_string()),
            ..SiteSettings::default()
        };
        current
            .extra
            .insert("theme".to_string(), serde_json::json!("dark"));

        let merged = merge(
            current.clone(),
            SettingsArgs {
                tagline: Some("Fresh daily".to_string()),
                ..no_changes()
            },
        );

        assert_eq!(merged.site_name.as_deref(), Some("Corner Shop"));
        assert_eq!(merged.tagline.as_deref(), Some("Fresh daily"));
        assert_eq!(merged.logo_url.as_deref(), Some("/logo.png"));
        assert_eq!(merged.extra.get("theme"), Some(&serde_json::json!("dark")));
    }

    #[test]
    fn test_merge_without_fields_is_identity() {
        let current = SiteSettings {
            address: Some("1 Main St".to_string()),
            ..SiteSettings::default()
        };
        assert_eq!(merge(current.clone(), no_changes()), current);
    }
}
