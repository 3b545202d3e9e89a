//! Minimal pipeline walkthrough using in-memory CSV sources.
//!
//! Run with: `cargo run --example explore`

use skillgraph::{ExplorerBuilder, config::AppConfig, dataset::DatasetKind};

fn main() {
    let sources = vec![
        (
            DatasetKind::Occupations,
            "ID,PREFERREDLABEL\nocc1,Welder\nocc2,Baker\n".to_string(),
        ),
        (
            DatasetKind::Skills,
            "ID,PREFERREDLABEL\nsk1,welding\nsk2,baking\n".to_string(),
        ),
        (
            DatasetKind::OccupationToSkillRelations,
            "OCCUPATIONID,SKILLID,RELATIONTYPE\nocc1,sk1,essential\nocc2,sk2,essential\n"
                .to_string(),
        ),
    ];

    let builder = ExplorerBuilder::new(AppConfig::default());

    let datasets = builder.ingest(sources).expect("ingest failed");
    let graph = builder.build_graph(&datasets).expect("graph build failed");
    let layout = builder.layout(&graph);
    let clusters = builder.cluster(&graph);

    let mut view = builder.view(&graph, clusters);
    view.expand_top(usize::MAX);

    let svg = builder.render_svg(&view, &layout).expect("render failed");
    println!("{svg}");
}
