//! A shop menu rendered to the log: paginated content, an async loaded
//! balance item and a clock refreshed by an updater.

use std::{sync::Arc, time::Duration};

use fastmenu::{
    ClickType, Identifier, ItemBuilder, ItemStack, Menu, MenuClickEvent, MenuContext,
    MenuUpdater, OpenWhenReady, PaginatedMenu, TextComponent, TickScheduler, Viewer,
    item::ItemFlags,
    logging::init_logger,
    menu::{async_menu::AsyncMenu, shared},
    server::scheduler::run_on_main,
};
use fastmenu_config::{LoadConfiguration, MenuConfiguration};
use fastmenu_util::text::color::NamedColor;
use uuid::Uuid;

struct ConsoleViewer {
    uuid: Uuid,
    name: String,
}

impl Viewer for ConsoleViewer {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn open_menu(&self, menu: &Menu) {
        log::info!(
            "{} opened {}",
            self.name,
            menu.title().clone().to_pretty_console()
        );
        for (slot, item) in menu.contents().iter().enumerate() {
            if let Some(item) = item {
                log::info!("  [{slot:2}] {} x{}", item.material, item.count);
            }
        }
    }

    fn update_slot(&self, slot: usize, item: Option<&ItemStack>) {
        match item {
            Some(item) => log::info!("  [{slot:2}] -> {} x{}", item.material, item.count),
            None => log::info!("  [{slot:2}] -> empty"),
        }
    }

    fn close_menu(&self) {
        log::info!("{} closed their menu", self.name);
    }
}

fn shop() -> PaginatedMenu {
    let mut menu =
        PaginatedMenu::titled(27, TextComponent::text("Shop").color_named(NamedColor::Gold))
            .expect("27 is a chest size");

    for material in ["apple", "bread", "carrot", "cookie", "melon_slice", "pumpkin_pie"]
        .iter()
        .cycle()
        .take(30)
    {
        let item = ItemBuilder::vanilla(material)
            .name(TextComponent::text(material.replace('_', " ")))
            .add_lore("Click to buy")
            .flags(ItemFlags::HIDE_ATTRIBUTES);
        let material = (*material).to_string();
        menu.add_content_with(item, move |_, event| {
            log::info!("{} bought {material}", event.viewer.name());
        });
    }

    let page_item = |page: usize| {
        ItemBuilder::vanilla("arrow")
            .name(format!("Page {page}"))
            .build()
    };
    menu.previous_page_item(18, page_item)
        .expect("slot 18 is in the menu");
    menu.next_page_item(26, page_item)
        .expect("slot 26 is in the menu");
    menu
}

#[tokio::main]
async fn main() {
    let data_dir = std::env::temp_dir().join("fastmenu-demo");
    let loaded = MenuConfiguration::load(&data_dir);
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logger(&config.logging);
    if let Err(err) = loaded {
        log::warn!("Using the default configuration: {err}");
    }

    let scheduler = TickScheduler::start(&config.scheduler);
    let context = MenuContext::new(scheduler.clone(), config);
    let viewer: Arc<dyn Viewer> = Arc::new(ConsoleViewer {
        uuid: Uuid::new_v4(),
        name: "Steve".to_string(),
    });

    let holder = shared(shop());
    let loader = AsyncMenu::new(context.clone(), holder.clone());
    let balance = loader.set_item_async(22, || {
        std::thread::sleep(Duration::from_millis(200));
        Ok::<_, String>(ItemBuilder::vanilla("gold_ingot").name("Balance: 120").build())
    });
    if let Err(err) = balance {
        log::error!("{err}");
    }
    let offline = loader.set_item_async(23, || Err::<ItemStack, _>("bank is offline"));
    if let Err(err) = offline {
        log::error!("{err}");
    }

    let open_viewer = viewer.clone();
    on_main(&context, move || {
        if let OpenWhenReady::Deferred(_) = loader.open_when_ready(open_viewer) {
            log::info!("Waiting for items before opening");
        }
    })
    .await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    let update_context = context.clone();
    let update_holder = holder.clone();
    let updater = on_main(&context, move || {
        let mut updater = MenuUpdater::for_context(&update_context).update_item(4, || {
            let seconds = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|time| time.as_secs() % 60)
                .unwrap_or_default();
            ItemStack::with_count(Identifier::vanilla("clock"), seconds as u8)
        });
        if let Err(err) = updater.start_updating(&update_context, &update_holder) {
            log::error!("{err}");
        }
        updater
    })
    .await;

    let click_context = context.clone();
    let click_viewer = viewer.clone();
    on_main(&context, move || {
        // Next page, then buy something on it
        let mut event = MenuClickEvent::new(click_viewer.clone(), 26, ClickType::Left);
        click_context.handle_click(&mut event);
        let mut event = MenuClickEvent::new(click_viewer, 3, ClickType::Left);
        click_context.handle_click(&mut event);
    })
    .await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    drop(updater);
    let closing = context.clone();
    on_main(&context, move || closing.handle_plugin_disable()).await;
    scheduler.shutdown();
}

async fn on_main<F, R>(context: &MenuContext, task: F) -> Option<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let main = context.main_thread().clone();
    match run_on_main(main.as_ref(), task).await {
        Ok(result) => Some(result),
        Err(err) => {
            log::error!("{err}");
            None
        }
    }
}
