//! Field extractors for T-Doll wiki pages.
//!
//! Each extractor reads one field out of a parsed page through a fixed
//! selector and fails if the node is missing. The selectors are tied to the
//! wiki's infobox template: stat cells carry a `data-tdoll-stat-id`
//! attribute, the class icon filename encodes class and rarity.

use scraper::{ElementRef, Html, Selector};

use crate::aura;
use crate::class::{BuffValueShape, WeaponClass};
use crate::error::ExtractError;
use crate::record::AuraBuffValues;

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

fn find<'a>(doc: &'a Html, field: &'static str, css: &str) -> Result<ElementRef<'a>, ExtractError> {
    doc.select(&selector(css)?)
        .next()
        .ok_or_else(|| ExtractError::Missing {
            field,
            selector: css.to_string(),
        })
}

fn attr<'a>(el: ElementRef<'a>, field: &'static str, name: &'static str) -> Result<&'a str, ExtractError> {
    el.value()
        .attr(name)
        .ok_or(ExtractError::MissingAttr { field, attr: name })
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

fn stat_selector(tag: &str, stat_id: &str) -> String {
    format!("{tag}[data-tdoll-stat-id=\"{stat_id}\"]")
}

fn stat_text(doc: &Html, field: &'static str, tag: &str, stat_id: &str) -> Result<String, ExtractError> {
    find(doc, field, &stat_selector(tag, stat_id)).map(text_of)
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, ExtractError> {
    raw.trim().parse().map_err(|_| ExtractError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })
}

fn stat_int(doc: &Html, field: &'static str, tag: &str, stat_id: &str) -> Result<i64, ExtractError> {
    parse_int(field, &stat_text(doc, field, tag, stat_id)?)
}

fn stat_pair(doc: &Html, field: &'static str, suffix: &str) -> Result<[i64; 2], ExtractError> {
    Ok([
        stat_int(doc, field, "td", &format!("min_{suffix}"))?,
        stat_int(doc, field, "td", &format!("max_{suffix}"))?,
    ])
}

/// Converts `"37.5%"` to `0.375`.
///
/// Only trailing percent signs are stripped; surrounding whitespace is
/// tolerated, anything else is not a number. `nan` and `inf` are rejected
/// since JSON cannot hold them.
pub fn parse_percent(raw: &str) -> Option<f64> {
    raw.trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v / 100.0)
}

fn percent(field: &'static str, raw: &str) -> Result<f64, ExtractError> {
    parse_percent(raw).ok_or_else(|| ExtractError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })
}

/// Drops the last `n` characters, or everything if there are fewer.
fn drop_last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return s;
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[..idx],
        None => "",
    }
}

fn class_icon_src(doc: &Html, field: &'static str) -> Result<String, ExtractError> {
    let icon = find(doc, field, "img.classificationsymbol")?;
    attr(icon, field, "src").map(str::to_string)
}

pub fn id(doc: &Html) -> Result<String, ExtractError> {
    find(doc, "id", "span.indexnumber").map(|el| text_of(el).trim().to_string())
}

/// The class code is the second `_`-separated token of the class icon
/// filename, e.g. `.../Icon_SMG_5star.png`.
pub fn weapon_class(doc: &Html) -> Result<WeaponClass, ExtractError> {
    let src = class_icon_src(doc, "wclass")?;
    let code = src.split('_').nth(1).ok_or_else(|| ExtractError::Malformed {
        field: "wclass",
        reason: format!("no class token in icon src {src:?}"),
    })?;
    code.parse()
}

/// Five characters taken from the end of the class icon filename
/// (`..._5star.png` gives `5star`). A different filename scheme silently
/// yields a different substring.
pub fn rarity(doc: &Html) -> Result<String, ExtractError> {
    let src = class_icon_src(doc, "rarity")?;
    let chars: Vec<char> = src.chars().collect();
    let start = chars.len().saturating_sub(9);
    let end = chars.len().saturating_sub(4);
    Ok(chars[start..end].iter().collect())
}

pub fn hp(doc: &Html) -> Result<[i64; 3], ExtractError> {
    Ok([
        stat_int(doc, "hp", "span", "min_hp")?,
        stat_int(doc, "hp", "span", "max_hp")?,
        stat_int(doc, "hp", "span", "hpmaxwd")?,
    ])
}

/// Resupply costs live in unlabeled cells of the stat tab container:
/// `"10 (x1) / 15 (x2) / ..."`, one entry per dummy-link tier.
fn resupply_costs(doc: &Html, field: &'static str, cell: usize) -> Result<Vec<i64>, ExtractError> {
    let container = find(doc, field, "div.stattabcontainer")?;
    let td = selector("td")?;
    let text = container
        .select(&td)
        .nth(cell)
        .map(text_of)
        .ok_or_else(|| ExtractError::Missing {
            field,
            selector: format!("div.stattabcontainer td:nth({cell})"),
        })?;

    text.split(" / ")
        .map(|cost| parse_int(field, drop_last_chars(cost.trim_matches('\n'), 4)))
        .collect()
}

pub fn ammo_cost(doc: &Html) -> Result<Vec<i64>, ExtractError> {
    resupply_costs(doc, "ammo_cost", 4)
}

pub fn ration_cost(doc: &Html) -> Result<Vec<i64>, ExtractError> {
    resupply_costs(doc, "ration_cost", 5)
}

pub fn damage(doc: &Html) -> Result<[i64; 2], ExtractError> {
    stat_pair(doc, "damage", "dmg")
}

pub fn evasion(doc: &Html) -> Result<[i64; 2], ExtractError> {
    stat_pair(doc, "evasion", "eva")
}

pub fn accuracy(doc: &Html) -> Result<[i64; 2], ExtractError> {
    stat_pair(doc, "accuracy", "acc")
}

pub fn rate_of_fire(doc: &Html) -> Result<[i64; 2], ExtractError> {
    stat_pair(doc, "rof", "rof")
}

pub fn move_speed(doc: &Html) -> Result<i64, ExtractError> {
    stat_int(doc, "move_speed", "td", "mov")
}

pub fn crit_rate(doc: &Html) -> Result<f64, ExtractError> {
    percent("crit_rate", stat_text(doc, "crit_rate", "td", "crit")?.trim_matches('\n'))
}

pub fn crit_damage(doc: &Html) -> Result<f64, ExtractError> {
    percent("crit_damage", stat_text(doc, "crit_damage", "td", "critdmg")?.trim_matches('\n'))
}

pub fn armor_pen(doc: &Html) -> Result<i64, ExtractError> {
    stat_int(doc, "armor_pen", "td", "penetration")
}

/// Armor range, only read for classes that have armor.
pub fn armor(class: WeaponClass, doc: &Html) -> Result<Option<[i64; 2]>, ExtractError> {
    if !class.traits().has_armor {
        return Ok(None);
    }
    stat_pair(doc, "armor", "armor").map(Some)
}

/// Magazine size, only read for classes that have one.
pub fn mag_size(class: WeaponClass, doc: &Html) -> Result<Option<i64>, ExtractError> {
    if !class.traits().has_mag_size {
        return Ok(None);
    }
    stat_int(doc, "mag_size", "td", "clipsize").map(Some)
}

/// First CSS class of every cell in the formation grid; `None` for cells
/// without one.
pub fn aura_tiles(doc: &Html) -> Result<Vec<Option<String>>, ExtractError> {
    let table = find(doc, "aura_tiles", "table.tilegridtable")?;
    let td = selector("td")?;
    Ok(table
        .select(&td)
        .map(|cell| {
            cell.value()
                .attr("class")
                .and_then(|classes| classes.split_whitespace().next())
                .map(str::to_string)
        })
        .collect())
}

fn aura_div<'a>(doc: &'a Html, field: &'static str, stat_id: &str) -> Result<ElementRef<'a>, ExtractError> {
    find(doc, field, &stat_selector("div", stat_id))
}

pub fn aura_targets(doc: &Html) -> Result<Vec<String>, ExtractError> {
    let text = text_of(aura_div(doc, "aura_targets", "aura1")?);
    Ok(aura::scan_targets(&text))
}

pub fn aura_buffs(doc: &Html) -> Result<Vec<String>, ExtractError> {
    let first = text_of(aura_div(doc, "aura_buffs", "aura2")?);
    let second = text_of(aura_div(doc, "aura_buffs", "aura3")?);
    Ok(aura::scan_buffs([first.as_str(), second.as_str()]))
}

/// Magnitudes of the aura buffs, shaped by the class.
///
/// Handguns list one value per dummy-link level in a nested `div`
/// (`"10% (x1)/12% (x2)/..."`); a description without that nested `div`
/// contributes nothing. Other classes give one flat list of every
/// `%`-bearing word.
pub fn aura_buff_values(class: WeaponClass, doc: &Html) -> Result<AuraBuffValues, ExtractError> {
    let field = "aura_buff_vals";
    let divs = [aura_div(doc, field, "aura2")?, aura_div(doc, field, "aura3")?];

    match class.traits().buff_values {
        BuffValueShape::PerLevel => {
            let nested = selector("div")?;
            let mut values = Vec::new();
            for div in divs {
                let Some(levels) = div.select(&nested).next() else {
                    continue;
                };
                let per_level = text_of(levels)
                    .split('/')
                    .filter(|piece| piece.contains('%'))
                    .map(|piece| percent(field, drop_last_chars(piece, 5)))
                    .collect::<Result<Vec<_>, _>>()?;
                values.push(per_level);
            }
            Ok(AuraBuffValues::PerLevel(values))
        }
        BuffValueShape::Flat => {
            let mut values = Vec::new();
            for div in divs {
                for word in text_of(div).split(' ').filter(|w| w.contains('%')) {
                    values.push(percent(field, word)?);
                }
            }
            Ok(AuraBuffValues::Flat(values))
        }
    }
}

/// `src` of the full-size profile artwork.
pub fn profile_image_src(doc: &Html) -> Result<String, ExtractError> {
    let img = find(doc, "profile_image", "img.dollprofileimage")?;
    attr(img, "profile_image", "src").map(str::to_string)
}

/// Names listed on the T-Doll index page, in page order.
pub fn index_names(doc: &Html) -> Result<Vec<String>, ExtractError> {
    let span = selector("span.name")?;
    Ok(doc
        .select(&span)
        .map(|el| text_of(el).trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn percent_conversion() {
        assert!(approx(parse_percent("37.5%").unwrap(), 0.375));
        assert!(approx(parse_percent("20%").unwrap(), 0.2));
        assert!(approx(parse_percent(" 150%").unwrap(), 1.5));
        assert!(approx(parse_percent("5").unwrap(), 0.05));
        assert!(parse_percent("20%.").is_none());
        assert!(parse_percent("%").is_none());
    }

    #[test]
    fn percent_rejects_non_finite() {
        for raw in ["nan%", "NaN", "inf%", "-inf%", "infinity%"] {
            assert!(parse_percent(raw).is_none(), "{raw}");
        }
        let err = percent("crit_rate", "inf%").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidNumber { field: "crit_rate", .. }));
    }

    #[test]
    fn drop_last_chars_counts_characters() {
        assert_eq!(drop_last_chars("10 (x1)", 4), "10 ");
        assert_eq!(drop_last_chars("12% (x1)", 5), "12%");
        assert_eq!(drop_last_chars("abc", 4), "");
        assert_eq!(drop_last_chars("abc", 0), "abc");
        assert_eq!(drop_last_chars("ünï", 1), "ün");
    }

    #[test]
    fn id_is_trimmed_text() {
        let doc = page(r#"<span class="indexnumber"> 2 </span>"#);
        assert_eq!(id(&doc).unwrap(), "2");
    }

    #[test]
    fn missing_node_is_reported_with_field() {
        let doc = page("<p>nothing here</p>");
        let err = id(&doc).unwrap_err();
        assert!(matches!(err, ExtractError::Missing { field: "id", .. }));
        assert!(err.to_string().contains("span.indexnumber"));
    }

    #[test]
    fn class_and_rarity_come_from_icon_filename() {
        let doc = page(r#"<img class="classificationsymbol" src="/images/Icon_SMG_5star.png">"#);
        assert_eq!(weapon_class(&doc).unwrap(), WeaponClass::Smg);
        assert_eq!(rarity(&doc).unwrap(), "5star");
    }

    #[test]
    fn rarity_of_short_filename_is_short() {
        let doc = page(r#"<img class="classificationsymbol" src="a_HG.png">"#);
        assert_eq!(rarity(&doc).unwrap(), "a_HG");
    }

    #[test]
    fn icon_without_underscore_is_malformed() {
        let doc = page(r#"<img class="classificationsymbol" src="icon.png">"#);
        assert!(matches!(
            weapon_class(&doc).unwrap_err(),
            ExtractError::Malformed { field: "wclass", .. }
        ));
    }

    #[test]
    fn unlisted_class_token_is_rejected() {
        let doc = page(r#"<img class="classificationsymbol" src="/images/Icon_SGx_5star.png">"#);
        assert!(matches!(
            weapon_class(&doc).unwrap_err(),
            ExtractError::UnknownWeaponClass(code) if code == "SGx"
        ));
    }

    #[test]
    fn icon_without_src_is_reported() {
        let doc = page(r#"<img class="classificationsymbol">"#);
        assert!(matches!(
            rarity(&doc).unwrap_err(),
            ExtractError::MissingAttr { field: "rarity", attr: "src" }
        ));
    }

    #[test]
    fn stat_pairs_and_singles() {
        let doc = page(
            r#"<table><tr>
                <td data-tdoll-stat-id="min_dmg">10</td><td data-tdoll-stat-id="max_dmg">
                 29 </td>
                <td data-tdoll-stat-id="mov">15</td>
                <td data-tdoll-stat-id="penetration">abc</td>
            </tr></table>"#,
        );
        assert_eq!(damage(&doc).unwrap(), [10, 29]);
        assert_eq!(move_speed(&doc).unwrap(), 15);
        assert!(matches!(
            armor_pen(&doc).unwrap_err(),
            ExtractError::InvalidNumber { field: "armor_pen", .. }
        ));
        assert!(evasion(&doc).is_err());
    }

    #[test]
    fn crit_values_are_fractions() {
        let doc = page(
            r#"<table><tr>
                <td data-tdoll-stat-id="crit">
20%
</td>
                <td data-tdoll-stat-id="critdmg">37.5%</td>
            </tr></table>"#,
        );
        assert!(approx(crit_rate(&doc).unwrap(), 0.2));
        assert!(approx(crit_damage(&doc).unwrap(), 0.375));
    }

    #[test]
    fn resupply_costs_drop_multiplier_suffix() {
        let doc = page(
            r#"<div class="stattabcontainer"><table><tr>
                <td>a</td><td>b</td><td>c</td><td>d</td>
                <td>
10 (x1) / 20 (x2) / 30 (x3) / 40 (x4) / 50 (x5)
</td>
                <td>15 (x1) / 30 (x2)</td>
            </tr></table></div>"#,
        );
        assert_eq!(ammo_cost(&doc).unwrap(), vec![10, 20, 30, 40, 50]);
        assert_eq!(ration_cost(&doc).unwrap(), vec![15, 30]);
    }

    #[test]
    fn resupply_cell_out_of_range_is_missing() {
        let doc = page(r#"<div class="stattabcontainer"><table><tr><td>1</td></tr></table></div>"#);
        assert!(matches!(
            ammo_cost(&doc).unwrap_err(),
            ExtractError::Missing { field: "ammo_cost", .. }
        ));
    }

    #[test]
    fn armor_is_only_read_for_shotguns() {
        let doc = page(
            r#"<table><tr>
                <td data-tdoll-stat-id="min_armor">10</td>
                <td data-tdoll-stat-id="max_armor">24</td>
                <td data-tdoll-stat-id="clipsize">5</td>
            </tr></table>"#,
        );
        for class in WeaponClass::ALL {
            let expected = (class == WeaponClass::Sg).then_some([10, 24]);
            assert_eq!(armor(class, &doc).unwrap(), expected, "{class}");
        }
        // Classes without armor never touch the page.
        assert_eq!(armor(WeaponClass::Ar, &page("")).unwrap(), None);
    }

    #[test]
    fn mag_size_is_only_read_for_shotguns_and_machine_guns() {
        let doc = page(r#"<table><tr><td data-tdoll-stat-id="clipsize">8</td></tr></table>"#);
        for class in WeaponClass::ALL {
            let expected = matches!(class, WeaponClass::Sg | WeaponClass::Mg).then_some(8);
            assert_eq!(mag_size(class, &doc).unwrap(), expected, "{class}");
        }
        assert!(mag_size(WeaponClass::Mg, &page("")).is_err());
    }

    #[test]
    fn aura_tiles_keep_empty_cells() {
        let doc = page(
            r#"<table class="tilegridtable"><tr>
                <td class="buff"></td><td></td><td class="self extra"></td>
            </tr></table>"#,
        );
        assert_eq!(
            aura_tiles(&doc).unwrap(),
            vec![Some("buff".to_string()), None, Some("self".to_string())]
        );
    }

    #[test]
    fn flat_buff_values_collect_percent_words() {
        let doc = page(
            r#"<div data-tdoll-stat-id="aura2">Increases damage by 12% and accuracy by 25%</div>
               <div data-tdoll-stat-id="aura3">Increases evasion by 10%</div>"#,
        );
        let values = aura_buff_values(WeaponClass::Smg, &doc).unwrap();
        match values {
            AuraBuffValues::Flat(v) => {
                assert_eq!(v.len(), 3);
                assert!(approx(v[0], 0.12) && approx(v[1], 0.25) && approx(v[2], 0.10));
            }
            other => panic!("expected flat values, got {other:?}"),
        }
    }

    #[test]
    fn flat_buff_values_reject_trailing_punctuation() {
        let doc = page(
            r#"<div data-tdoll-stat-id="aura2">Increases damage by 12%.</div>
               <div data-tdoll-stat-id="aura3"></div>"#,
        );
        assert!(aura_buff_values(WeaponClass::Ar, &doc).is_err());
    }

    #[test]
    fn per_level_buff_values_skip_divs_without_levels() {
        let doc = page(
            r#"<div data-tdoll-stat-id="aura2">Increases damage by
                 <div>10% (x1)/12% (x2)/14% (x3)</div></div>
               <div data-tdoll-stat-id="aura3">No nested levels here</div>"#,
        );
        match aura_buff_values(WeaponClass::Hg, &doc).unwrap() {
            AuraBuffValues::PerLevel(v) => {
                assert_eq!(v.len(), 1);
                assert_eq!(v[0].len(), 3);
                assert!(approx(v[0][0], 0.10) && approx(v[0][2], 0.14));
            }
            other => panic!("expected per-level values, got {other:?}"),
        }
    }

    #[test]
    fn profile_image_and_index_names() {
        let doc = page(
            r#"<img class="dollprofileimage" src="/images/M1911.png">
               <span class="name">M1911</span><span class="name"> Gr G41 </span>"#,
        );
        assert_eq!(profile_image_src(&doc).unwrap(), "/images/M1911.png");
        assert_eq!(index_names(&doc).unwrap(), vec!["M1911", "Gr G41"]);
    }
}
