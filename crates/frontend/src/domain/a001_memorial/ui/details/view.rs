use super::editors::{BannerEditor, BiographyEditor, DatesEditor, NameEditor, QuoteEditor};
use super::view_model::MemorialDetailsViewModel;
use contracts::domain::a001_memorial::aggregate::MemorialId;
use leptos::prelude::*;

#[component]
pub fn MemorialDetails(id: MemorialId) -> impl IntoView {
    let vm = MemorialDetailsViewModel::new(id);
    vm.load();

    view! {
        <div class="memorial-page">
            {move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div
                class=move || format!("memorial-banner {}", vm.banner.with(|f| f.display().class()))
                style=move || vm.banner.with(|f| f.display().style())
            >
                <BannerEditor vm=vm />
            </div>

            <div class="memorial-header">
                <div class="memorial-field">
                    <h1 class="memorial-name">{move || vm.name.with(|f| f.display().clone())}</h1>
                    <NameEditor vm=vm />
                </div>
                <div class="memorial-field">
                    <p class="memorial-dates">{move || vm.dates.with(|f| f.display().clone())}</p>
                    <DatesEditor vm=vm />
                </div>
                <div class="memorial-field">
                    <blockquote class="memorial-quote">
                        {move || vm.quote.with(|f| f.display().clone())}
                    </blockquote>
                    <QuoteEditor vm=vm />
                </div>
            </div>

            <section class="memorial-biography">
                <h2>{"Biography"}</h2>
                <BiographyEditor vm=vm />
            </section>
        </div>
    }
}
