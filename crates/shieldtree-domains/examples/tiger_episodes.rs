use std::path::PathBuf;

use shieldtree_core::{Planner, SearchConfig};
use shieldtree_domains::{EpisodeConfig, Tiger, build_shield_yaml, run_episode};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/shieldtree-domains/examples/sample.shield.yaml"));
    let shield = build_shield_yaml(&path).expect("failed to load shield YAML");

    let config = SearchConfig {
        num_simulations: 1000,
        max_depth: 20,
        use_shield: true,
        ..SearchConfig::default()
    };

    let episodes = 20;
    let mut total = 0.0;
    let mut deprived = 0;
    for seed in 0..episodes {
        let mut planner: Planner<Tiger> = Planner::new(
            Tiger::with_shield(shield.clone()),
            SearchConfig { seed, ..config.clone() },
        )
        .expect("invalid search config");
        let result = run_episode(&mut planner, &EpisodeConfig { num_steps: 50, seed })
            .expect("episode failed");

        println!(
            "episode={} steps={} return={:.1} terminated={}",
            seed,
            result.num_steps(),
            result.undiscounted_return,
            result.terminated
        );
        total += result.undiscounted_return;
        if result.ran_out_of_particles() {
            deprived += 1;
        }
    }

    println!("average_return={:.3}", total / episodes as f64);
    println!("deprived_episodes={}", deprived);
}
