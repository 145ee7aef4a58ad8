use proptest::prelude::*;
use storefront_sync::lifecycle::StorefrontSystem;
use storefront_sync::model::{CartId, ProductCreate, ProductId};

#[derive(Debug, Clone)]
enum Op {
    Add { cart: usize, product: usize, quantity: u32 },
    Update { cart: usize, product: usize, quantity: u32 },
    Remove { cart: usize, product: usize },
    Clear { cart: usize },
    Delete { cart: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..2usize, 0..6u32).prop_map(|(cart, product, quantity)| Op::Add {
            cart,
            product,
            quantity
        }),
        (0..3usize, 0..2usize, 0..6u32).prop_map(|(cart, product, quantity)| Op::Update {
            cart,
            product,
            quantity
        }),
        (0..3usize, 0..2usize).prop_map(|(cart, product)| Op::Remove { cart, product }),
        (0..3usize).prop_map(|cart| Op::Clear { cart }),
        (0..3usize).prop_map(|cart| Op::Delete { cart }),
    ]
}

async fn run(ops: Vec<Op>, initial: [u32; 2]) -> Result<(), TestCaseError> {
    let system = StorefrontSystem::new();
    let c = &system.coordinator;
    let mut products: Vec<ProductId> = Vec::new();
    for (i, stock) in initial.iter().enumerate() {
        let id = c
            .create_product(ProductCreate::new("P", format!("P{i}"), 1.0, *stock, "x"))
            .await
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        products.push(id);
    }
    let mut carts: Vec<CartId> = Vec::new();
    for _ in 0..3 {
        carts.push(c.create_cart().await.map_err(|e| TestCaseError::fail(e.to_string()))?);
    }

    for op in ops {
        // Rejections are expected; the invariant must hold regardless.
        let _ = match op {
            Op::Add { cart, product, quantity } => {
                c.add_to_cart(carts[cart], products[product], quantity).await.map(|_| ())
            }
            Op::Update { cart, product, quantity } => c
                .update_line_quantity(carts[cart], products[product], quantity)
                .await
                .map(|_| ()),
            Op::Remove { cart, product } => {
                c.remove_from_cart(carts[cart], products[product]).await.map(|_| ())
            }
            Op::Clear { cart } => c.clear_cart(carts[cart]).await.map(|_| ()),
            Op::Delete { cart } => {
                let deleted = c.delete_cart(carts[cart]).await.map(|_| ());
                carts[cart] = c
                    .create_cart()
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                deleted
            }
        };

        let all_carts = c
            .list_carts()
            .await
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(all_carts.len(), carts.len());

        for (i, product) in products.iter().enumerate() {
            let stock = system
                .product_client
                .check_stock(*product)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let mut held = 0;
            for cart in &all_carts {
                prop_assert!(cart.lines.iter().all(|line| line.quantity >= 1));
                held += cart.quantity_of(*product);
            }
            prop_assert_eq!(stock + held, initial[i]);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn stock_plus_held_is_conserved(
        ops in prop::collection::vec(op(), 1..25),
        initial in (0..8u32, 0..8u32),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(run(ops, [initial.0, initial.1]))?;
    }
}
