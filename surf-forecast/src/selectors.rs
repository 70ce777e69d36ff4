//! Element locators for the forecast dashboard.

use crate::browser::Locator;
use crate::observation::Slot;

/// Forecast page scraped when no other target is configured.
pub const DEFAULT_TARGET_URL: &str =
    "https://www.surfguru.com.br/previsao/el-salvador/la-libertad/la-libertad";

pub fn cookie_accept() -> Locator {
    Locator::css("#aceitar_cookies_conteudo button")
}

pub fn login_link() -> Locator {
    Locator::xpath(r#"//*[@id="deslogado"]/ul/li[1]/a"#)
}

pub fn email_field() -> Locator {
    Locator::id("UsuarioEmail")
}

pub fn password_field() -> Locator {
    Locator::id("UsuarioSenha")
}

pub fn login_submit() -> Locator {
    Locator::css(r#"#menu_login input[type="submit"]"#)
}

pub fn page_body() -> Locator {
    Locator::tag("body")
}

/// The date-picker input; its `value` reads `"<month> - <year>"`.
pub fn date_picker() -> Locator {
    Locator::id("datepicker")
}

pub fn year_select() -> Locator {
    Locator::css("#ui-datepicker-div > div > div > select.ui-datepicker-year")
}

pub fn month_select() -> Locator {
    Locator::css("#ui-datepicker-div > div > div > select.ui-datepicker-month")
}

/// Day link in the rendered calendar grid, matched on its exact text.
pub fn day_cell(day: u32) -> Locator {
    Locator::xpath(format!(
        r#"//*[@id="ui-datepicker-div"]/table/tbody//a[normalize-space(text())="{day}"]"#
    ))
}

pub fn view_button() -> Locator {
    Locator::id("btn-ver")
}

pub fn chart_marker(slot: Slot) -> Locator {
    Locator::id(format!("title_dia{}_hora{}", slot.day, slot.hour))
}

/// Tooltip field holding `day/month`.
pub fn tooltip_date() -> Locator {
    Locator::css("#data b")
}

pub fn tooltip_hour() -> Locator {
    Locator::id("hora")
}

pub fn tooltip_wave_size() -> Locator {
    Locator::id("tot_alt")
}

pub fn tooltip_wave_period() -> Locator {
    Locator::id("tot_per")
}

/// Scrolls the chart strip so the last day's markers can receive hover events.
pub const BOUNDARY_SCROLL_FIX: &str =
    "function() { this.scrollIntoView({ block: 'center', inline: 'end' }); }";
