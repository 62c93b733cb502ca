use super::repository;
use chrono::NaiveDate;
use contracts::domain::a001_memorial::aggregate::{validate_dates, Memorial, MemorialDto};
use contracts::domain::a001_memorial::banner::BannerSelection;
use contracts::domain::a001_memorial::display;
use contracts::domain::a001_memorial::edit::{
    FieldId, UpdateBannerForm, UpdateBiographyForm, UpdateDatesForm, UpdateNameForm, UpdateQuoteRequest,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MemorialError {
    #[error("Memorial not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MemorialError>;

/// Создание нового мемориала
pub async fn create(dto: MemorialDto) -> Result<Uuid> {
    let mut aggregate = Memorial::new_for_insert(&dto);

    aggregate.validate().map_err(MemorialError::Validation)?;
    aggregate.before_write();

    Ok(repository::insert(&aggregate).await?)
}

pub async fn get_by_id(id: Uuid) -> Result<Memorial> {
    repository::get_by_id(id)
        .await?
        .ok_or(MemorialError::NotFound)
}

/// Список мемориалов, по фамилии
pub async fn list_all() -> Result<Vec<Memorial>> {
    Ok(repository::list_all().await?)
}

/// Load, change and stamp one memorial, then store only the columns of `field`
async fn modify<T>(
    id: Uuid,
    field: FieldId,
    change: impl FnOnce(&mut Memorial) -> Result<T>,
) -> Result<T> {
    let mut aggregate = get_by_id(id).await?;
    let out = change(&mut aggregate)?;
    aggregate.before_write();
    if !repository::update_field(&aggregate, field).await? {
        return Err(MemorialError::NotFound);
    }
    Ok(out)
}

pub async fn update_name(id: Uuid, form: &UpdateNameForm) -> Result<String> {
    modify(id, FieldId::Name, |m| apply_name(m, form)).await
}

pub async fn update_dates(id: Uuid, form: &UpdateDatesForm) -> Result<String> {
    let today = chrono::Utc::now().date_naive();
    modify(id, FieldId::Dates, |m| apply_dates(m, form, today)).await
}

/// Returns the stored quote, possibly empty
pub async fn update_quote(id: Uuid, request: &UpdateQuoteRequest) -> Result<String> {
    modify(id, FieldId::Quote, |m| Ok(apply_quote(m, request))).await
}

pub async fn update_banner(id: Uuid, form: &UpdateBannerForm) -> Result<BannerSelection> {
    modify(id, FieldId::Banner, |m| apply_banner(m, form)).await
}

/// Returns the biography as the HTML fragment the page renders
pub async fn update_biography(id: Uuid, form: &UpdateBiographyForm) -> Result<String> {
    modify(id, FieldId::Biography, |m| Ok(apply_biography(m, form))).await
}

/// Returns the full name as displayed
pub fn apply_name(memorial: &mut Memorial, form: &UpdateNameForm) -> Result<String> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    if first_name.is_empty() {
        return Err(MemorialError::Validation("First name is required".into()));
    }
    if last_name.is_empty() {
        return Err(MemorialError::Validation("Last name is required".into()));
    }

    let middle_name = form.middle_name.trim();
    memorial.first_name = first_name.to_string();
    memorial.middle_name = Some(middle_name.to_string()).filter(|s| !s.is_empty());
    memorial.last_name = last_name.to_string();
    Ok(memorial.full_name())
}

/// Both dates are required; returns the displayed range
pub fn apply_dates(
    memorial: &mut Memorial,
    form: &UpdateDatesForm,
    today: NaiveDate,
) -> Result<String> {
    let date_of_birth =
        display::parse_input_date(&form.date_of_birth).map_err(MemorialError::Validation)?;
    let date_of_death =
        display::parse_input_date(&form.date_of_death).map_err(MemorialError::Validation)?;
    validate_dates(date_of_birth, Some(date_of_death), today).map_err(MemorialError::Validation)?;

    memorial.date_of_birth = date_of_birth;
    memorial.date_of_death = Some(date_of_death);
    Ok(memorial.dates_display())
}

pub fn apply_quote(memorial: &mut Memorial, request: &UpdateQuoteRequest) -> String {
    let quote = request.quote.trim().to_string();
    memorial.quote = Some(quote.clone()).filter(|q| !q.is_empty());
    quote
}

pub fn apply_banner(memorial: &mut Memorial, form: &UpdateBannerForm) -> Result<BannerSelection> {
    let selection = BannerSelection::from_parts(&form.banner_type, &form.banner_value)
        .map_err(MemorialError::Validation)?;
    memorial.banner = selection.clone();
    Ok(selection)
}

pub fn apply_biography(memorial: &mut Memorial, form: &UpdateBiographyForm) -> String {
    memorial.biography = Some(form.biography.clone());
    memorial.biography_html()
}

pub async fn insert_test_data() -> Result<()> {
    let data = vec![
        MemorialDto {
            first_name: "Eleanor".into(),
            middle_name: Some("Grace".into()),
            last_name: "Whitfield".into(),
            date_of_birth: date(1931, 4, 12),
            date_of_death: Some(date(2019, 11, 3)),
            quote: Some("She made every room feel like home.".into()),
            biography: Some(
                "Eleanor taught piano for fifty years.\nHer students still play her songs."
                    .into(),
            ),
        },
        MemorialDto {
            first_name: "Thomas".into(),
            middle_name: None,
            last_name: "Okafor".into(),
            date_of_birth: date(1948, 9, 30),
            date_of_death: Some(date(2021, 2, 14)),
            quote: None,
            biography: Some("Engineer, gardener and grandfather of six.".into()),
        },
        MemorialDto {
            first_name: "Marta".into(),
            middle_name: None,
            last_name: "Lindqvist".into(),
            date_of_birth: date(1965, 6, 1),
            date_of_death: Some(date(2023, 8, 22)),
            quote: None,
            biography: None,
        },
    ];

    for dto in data {
        let id = create(dto).await?;
        tracing::info!("Inserted test memorial {}", id);
    }

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
