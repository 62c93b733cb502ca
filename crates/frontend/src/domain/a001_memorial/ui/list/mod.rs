use crate::shared::api_utils::api_url;
use crate::shared::csrf;
use contracts::domain::a001_memorial::aggregate::Memorial;
use contracts::shared::csrf::CSRF_HEADER;
use gloo_net::http::Request;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct MemorialRow {
    pub id: String,
    pub name: String,
    pub dates: String,
    pub href: String,
}

impl From<Memorial> for MemorialRow {
    fn from(m: Memorial) -> Self {
        let id = m.to_string_id();
        Self {
            href: format!("/memorials/{}/", id),
            name: m.full_name(),
            dates: m.dates_display(),
            id,
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn MemorialList() -> impl IntoView {
    let (items, set_items) = signal::<Vec<MemorialRow>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let fetch = move || {
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_memorials().await {
                Ok(v) => {
                    set_items.set(v.into_iter().map(Into::into).collect());
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let seed = move |_| {
        wasm_bindgen_futures::spawn_local(async move {
            match insert_test_data().await {
                Ok(()) => fetch(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    fetch();

    view! {
        <div class="content memorial-list">
            <div class="header">
                <h2>{"Memorials"}</h2>
                <div class="header-actions">
                    <button class="btn btn-secondary" on:click=move |_| fetch()>{"Refresh"}</button>
                    <button class="btn btn-secondary" on:click=seed>{"Add demo memorials"}</button>
                </div>
            </div>

            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}

            <table class="table">
                <thead>
                    <tr>
                        <th>{"Name"}</th>
                        <th>{"Dates"}</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|row| row.id.clone()
                        children=move |row: MemorialRow| {
                            view! {
                                <tr>
                                    <td><a href=row.href.clone()>{row.name.clone()}</a></td>
                                    <td>{row.dates.clone()}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}

async fn fetch_memorials() -> Result<Vec<Memorial>, String> {
    let response = Request::get(&api_url("/api/memorials"))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .json::<Vec<Memorial>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn insert_test_data() -> Result<(), String> {
    let token = csrf::resolve_token().await?;
    let response = Request::post(&api_url("/api/memorials/testdata"))
        .header(CSRF_HEADER, token.as_str())
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_memorial::aggregate::MemorialDto;

    #[test]
    fn row_links_to_memorial_page() {
        let memorial = Memorial::new_for_insert(&MemorialDto {
            first_name: "Jane".into(),
            middle_name: Some("Ann".into()),
            last_name: "Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1950, 1, 2).unwrap(),
            date_of_death: None,
            quote: None,
            biography: None,
        });
        let id = memorial.to_string_id();

        let row = MemorialRow::from(memorial);
        assert_eq!(row.name, "Jane Ann Doe");
        assert_eq!(row.dates, "January 02, 1950");
        assert_eq!(row.href, format!("/memorials/{}/", id));
    }
}
