use std::collections::HashMap;

use farm_balance::{
    Animal, BarnCapacity, Color, CreationOrder, EvictOutcome, MemoryStore, PartitionService,
    PartitionStore,
};
use farm_id::BarnId;

fn farm() -> PartitionService<MemoryStore> {
    PartitionService::new(MemoryStore::new(), BarnCapacity::DEFAULT)
}

async fn place_many(service: &PartitionService<MemoryStore>, color: Color, n: usize) -> Vec<Animal> {
    let animals = (0..n)
        .map(|i| Animal::new(format!("{color}-{i}"), color))
        .collect();
    service.place_all(animals).await.unwrap()
}

async fn loads_by_barn(service: &PartitionService<MemoryStore>, color: Color) -> HashMap<BarnId, usize> {
    let mut loads = HashMap::new();
    for animal in service.store().find_animals_by_color(color).await.unwrap() {
        *loads.entry(animal.barn.unwrap()).or_insert(0) += 1;
    }
    loads
}

#[tokio::test]
async fn twenty_animals_share_one_barn() {
    let service = farm();
    let placed = place_many(&service, Color::Red, 20).await;

    let barns = service
        .store()
        .find_barns_by_color(Color::Red, CreationOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(barns.len(), 1);
    assert!(placed.iter().all(|a| a.barn == Some(barns[0].id)));
    assert_eq!(loads_by_barn(&service, Color::Red).await[&barns[0].id], 20);
}

#[tokio::test]
async fn twenty_first_animal_opens_second_barn() {
    let service = farm();
    place_many(&service, Color::Red, 20).await;

    let newcomer = service
        .place(Animal::new("newcomer", Color::Red))
        .await
        .unwrap();

    let barns = service
        .store()
        .find_barns_by_color(Color::Red, CreationOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(barns.len(), 2);
    assert_eq!(barns[1].name, "Red-1");

    // Prior 20 alternate between the two barns in creation order.
    let animals = service.store().find_animals_by_color(Color::Red).await.unwrap();
    for (i, animal) in animals.iter().take(20).enumerate() {
        assert_eq!(animal.barn, Some(barns[i % 2].id), "animal {i}");
    }
    // 20 mod 2 == 0
    assert_eq!(newcomer.barn, Some(barns[0].id));

    let loads = loads_by_barn(&service, Color::Red).await;
    assert_eq!(loads[&barns[0].id], 11);
    assert_eq!(loads[&barns[1].id], 10);
}

#[tokio::test]
async fn evicting_back_to_twenty_retires_newest_barn() {
    let service = farm();
    let placed = place_many(&service, Color::Red, 21).await;
    let barns = service
        .store()
        .find_barns_by_color(Color::Red, CreationOrder::Ascending)
        .await
        .unwrap();

    let outcome = service.evict(&placed[5]).await.unwrap();

    assert!(matches!(outcome, EvictOutcome::BarnRetired { barn, .. } if barn == barns[1].id));
    let remaining = service
        .store()
        .find_barns_by_color(Color::Red, CreationOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(remaining, vec![barns[0].clone()]);
    assert_eq!(loads_by_barn(&service, Color::Red).await[&barns[0].id], 20);
}

#[tokio::test]
async fn eviction_inside_boundary_changes_nothing_else() {
    let service = farm();
    let reds = place_many(&service, Color::Red, 20).await;
    place_many(&service, Color::Blue, 20).await;
    let blue_before = service.store().find_animals_by_color(Color::Blue).await.unwrap();

    let outcome = service.evict(&reds[0]).await.unwrap();

    assert_eq!(outcome, EvictOutcome::Removed);
    assert_eq!(service.store().all_barns().unwrap().len(), 2);
    let red_loads = loads_by_barn(&service, Color::Red).await;
    assert_eq!(red_loads.values().copied().collect::<Vec<_>>(), vec![19]);
    assert_eq!(
        service.store().find_animals_by_color(Color::Blue).await.unwrap(),
        blue_before
    );
}

#[tokio::test]
async fn two_point_gap_moves_exactly_one_animal() {
    let service = farm();
    // 29 animals over two barns: 15 / 14.
    let placed = place_many(&service, Color::Green, 29).await;
    let barns = service
        .store()
        .find_barns_by_color(Color::Green, CreationOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(barns.len(), 2);
    let loads = loads_by_barn(&service, Color::Green).await;
    assert_eq!((loads[&barns[0].id], loads[&barns[1].id]), (15, 14));

    // Take one from the smaller barn: 15 / 13, gap of two.
    let victim = placed
        .iter()
        .rev()
        .find(|a| a.barn == Some(barns[1].id))
        .unwrap();
    let outcome = service.evict(victim).await.unwrap();

    match outcome {
        EvictOutcome::Rebalanced { from, to, .. } => {
            assert_eq!(from, barns[0].id);
            assert_eq!(to, barns[1].id);
        }
        other => panic!("expected a rebalance, got {other:?}"),
    }
    let loads = loads_by_barn(&service, Color::Green).await;
    assert_eq!((loads[&barns[0].id], loads[&barns[1].id]), (14, 14));
}

#[tokio::test]
async fn evict_all_reloads_and_skips_unknown() {
    let service = farm();
    let placed = place_many(&service, Color::Yellow, 3).await;
    let ghost = Animal::new("ghost", Color::Yellow);

    let outcomes = service
        .evict_all(&[placed[0].clone(), ghost, placed[1].clone(), placed[2].clone()])
        .await
        .unwrap();

    assert_eq!(outcomes[0], EvictOutcome::Removed);
    assert_eq!(outcomes[1], EvictOutcome::Missing);
    assert_eq!(outcomes[2], EvictOutcome::Removed);
    assert_eq!(outcomes[3], EvictOutcome::Emptied { barns_removed: 1 });
    assert!(service.store().all_barns().unwrap().is_empty());
}

#[tokio::test]
async fn colors_never_mix() {
    let service = farm();
    for i in 0..70 {
        let color = Color::ALL[i % Color::ALL.len()];
        service.place(Animal::new(format!("a{i}"), color)).await.unwrap();
    }

    let barns = service.store().all_barns().unwrap();
    for animal in service.find_all().await.unwrap() {
        let barn = barns.iter().find(|b| Some(b.id) == animal.barn).unwrap();
        assert_eq!(barn.color, animal.favorite_color);
    }
    for report in service.inspect_all().await.unwrap() {
        assert!(report.is_balanced(), "{:?}", report);
    }
}

#[tokio::test]
async fn failed_eviction_surfaces_store_error() {
    let service = farm();
    let placed = place_many(&service, Color::Indigo, 21).await;

    // Delete succeeds, redistribution fails on its first write.
    service.store().fail_writes_after(1).unwrap();
    let err = service.evict(&placed[0]).await.unwrap_err();
    assert!(err.is_store());

    // Both barns still exist; the partial state is visible to an audit.
    assert_eq!(service.store().all_barns().unwrap().len(), 2);
    service.store().heal().unwrap();
    let report = service.inspect(Color::Indigo).await.unwrap();
    assert_eq!(report.animals, 20);
    assert!(!report.is_balanced());
}
