//! [`Discount`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::Discount,
    infra::{
        database::{self, in_memory::Access, InMemory},
        Database,
    },
};

impl<C: Access> Database<Select<By<Vec<Discount>, Date>>> for InMemory<C> {
    type Ok = Vec<Discount>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Discount>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let on = by.into_inner();
        Ok(self
            .0
            .with(|state| {
                state
                    .discounts
                    .values()
                    .filter(|d| d.is_active_on(on))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<C: Access> Database<Insert<Discount>> for InMemory<C> {
    type Ok = Discount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut discount): Insert<Discount>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .with(move |state| {
                state.last_ids.discount += 1;
                discount.id = state.last_ids.discount.into();
                drop(state.discounts.insert(discount.id, discount.clone()));
                discount
            })
            .await)
    }
}
