use rdx_merge::{by_id, by_id_then_payload, KeepMax, Union};
use stress_test::{stress_test_merge, stress_test_scaling, HarnessResult};
use tracing_subscriber::EnvFilter;

fn main() -> HarnessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_main())
}

async fn async_main() -> HarnessResult<()> {
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC MERGE STRESS TESTS                         ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: last-writer-wins at small scale
    let stats = stress_test_merge("keep-max", by_id, KeepMax, 4, 100, 200).await?;
    stats.print();

    // Test 2: multi-value at small scale
    let stats = stress_test_merge("union", by_id_then_payload, Union, 4, 100, 200).await?;
    stats.print();

    // Test 3: last-writer-wins at medium scale
    let stats = stress_test_merge("keep-max", by_id, KeepMax, 10, 500, 1000).await?;
    stats.print();

    // Test 4: multi-value at medium scale
    let stats = stress_test_merge("union", by_id_then_payload, Union, 10, 500, 1000).await?;
    stats.print();

    // Test 5: fan-in scaling up to the default capacity
    stress_test_scaling(by_id, KeepMax, 64, 16).await?;

    println!("\n✓ All stress tests completed successfully!");
    Ok(())
}
