//! [`Query`] resolving the currently best [`Discount`] offer.

use common::{
    operations::{By, Select},
    Date, Percent,
};
use tracerr::Traced;

use crate::{
    domain::{discount, Discount},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] resolving the best [`Discount`] percentage active on the
/// provided [`Date`].
///
/// Resolves to [`Percent::ZERO`] when no [`Discount`] is active, which is a
/// normal non-error outcome.
#[derive(Clone, Copy, Debug)]
pub struct BestOffer {
    /// [`Date`] to resolve the [`Discount`]s on.
    pub on: Date,
}

impl<Db, Rp> Query<BestOffer> for Service<Db, Rp>
where
    Db: Database<
        Select<By<Vec<Discount>, Date>>,
        Ok = Vec<Discount>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Percent;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        BestOffer { on }: BestOffer,
    ) -> Result<Self::Ok, Self::Err> {
        let offers = self
            .database()
            .execute(Select(By::<Vec<Discount>, _>::new(on)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(discount::best_percent(&offers, on))
    }
}
