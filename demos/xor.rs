use rusty_perceptron::{
    trainer::TracingLogger, LinearBuilder, Network, Sample, SamplesSet, Trainer, TrainingConfig,
};

fn data() -> SamplesSet {
    vec![
        Sample::new(vec![0., 0.], vec![0.]),
        Sample::new(vec![0., 1.], vec![1.]),
        Sample::new(vec![1., 0.], vec![1.]),
        Sample::new(vec![1., 1.], vec![0.]),
    ]
    .into()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let network = LinearBuilder::new(2).layer(4).layer(1).learning_rate(2.).build()?;
    // four samples per epoch, only the closing report is worth printing
    let config = TrainingConfig {
        report_every: 0,
        ..Default::default()
    };
    let mut trainer = Trainer::new(network)
        .with_config(config)
        .with_logger(TracingLogger);

    let data = data();
    let loss = trainer.train_dataset(&data, 5000, 0.02)?;
    println!("Finished fitting xor with loss {}", loss);

    for sample in &data {
        let out = trainer.compute(&sample.input)?[0];
        println!("{:?} -> {:.3} (expected {})", sample.input, out, sample.target[0]);
    }

    let path = std::env::temp_dir().join("xor_network.json");
    trainer.save(&path)?;
    println!("Saved network to {}", path.display());
    Ok(())
}
